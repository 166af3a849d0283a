/// Row visibility after applying a search query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterOutcome {
    pub visible: Vec<bool>,
    pub no_results: bool,
}

impl FilterOutcome {
    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|shown| **shown).count()
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }
}

/// Case-insensitive substring match of `query` against each file name.
/// An empty query matches every row.
pub fn filter_names<I, S>(names: I, query: &str) -> FilterOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let query = query.to_lowercase();
    let visible: Vec<bool> = names
        .into_iter()
        .map(|name| name.as_ref().to_lowercase().contains(&query))
        .collect();
    let no_results = !visible.iter().any(|shown| *shown);

    FilterOutcome { visible, no_results }
}
