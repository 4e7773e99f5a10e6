use std::fmt;

/// Markup that is already safe to inject as HTML.
///
/// Only the template builder and [`trust_html`] construct one. There is no
/// way to mutate a fragment after construction; fragments combine by being
/// nested in further templates or collected with [`SafeFragment::concat`].
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct SafeFragment {
    markup: String,
}

impl SafeFragment {
    pub(crate) fn from_rendered(markup: String) -> Self {
        Self { markup }
    }

    /// A fragment with no markup.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The rendered markup, for committing into a document.
    pub fn as_str(&self) -> &str {
        &self.markup
    }

    pub fn is_empty(&self) -> bool {
        self.markup.is_empty()
    }

    pub fn len(&self) -> usize {
        self.markup.len()
    }

    /// Concatenate fragments in order, with no separator.
    pub fn concat<I>(fragments: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<SafeFragment>,
    {
        let mut markup = String::new();
        for fragment in fragments {
            markup.push_str(fragment.as_ref().as_str());
        }
        Self::from_rendered(markup)
    }
}

impl AsRef<SafeFragment> for SafeFragment {
    fn as_ref(&self) -> &SafeFragment {
        self
    }
}

impl FromIterator<SafeFragment> for SafeFragment {
    fn from_iter<I: IntoIterator<Item = SafeFragment>>(iter: I) -> Self {
        Self::concat(iter)
    }
}

impl fmt::Display for SafeFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.markup)
    }
}

impl fmt::Debug for SafeFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SafeFragment").field(&self.markup).finish()
    }
}

/// Wrap caller-supplied markup as a [`SafeFragment`] without escaping it.
///
/// This is the single bypass of the escaper. It validates nothing: the
/// caller vouches for `raw`. Keep uses rare and greppable.
pub fn trust_html(raw: impl Into<String>) -> SafeFragment {
    let markup = raw.into();
    tracing::trace!(len = markup.len(), "Trusted markup bypasses escaping");
    SafeFragment::from_rendered(markup)
}
