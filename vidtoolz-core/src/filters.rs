//! Builders for ffmpeg filter strings.

/// Builder for a linear filter chain (`a,b,c`), as used with `-vf`/`-af`.
#[derive(Debug, Default, Clone)]
pub struct FilterChain {
    filters: Vec<String>,
}

impl FilterChain {
    /// Creates a new empty filter chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter to the chain; empty strings are ignored
    #[must_use]
    pub fn add(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        if !filter.is_empty() {
            self.filters.push(filter);
        }
        self
    }

    /// Adds a filter only when `condition` holds
    #[must_use]
    pub fn add_if(self, condition: bool, filter: impl FnOnce() -> String) -> Self {
        if condition { self.add(filter()) } else { self }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Builds the filter chain into a single filter string
    #[must_use]
    pub fn build(self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.join(","))
        }
    }
}

/// Builder for a `-filter_complex` graph made of labelled chains.
///
/// Each chain reads from its input pads and writes to its output pads:
/// `[0:v][ovr]overlay=0:0[vout]`. Chains are joined with `;`.
#[derive(Debug, Default, Clone)]
pub struct FilterGraph {
    chains: Vec<String>,
}

impl FilterGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chain. A chain whose filter is empty is replaced by the
    /// pass-through `null`/`anull` filter so its labels stay connected.
    #[must_use]
    pub fn chain(mut self, inputs: &[&str], filter: FilterChain, outputs: &[&str]) -> Self {
        let audio = inputs.iter().any(|pad| pad.ends_with(":a"));
        let body = filter
            .build()
            .unwrap_or_else(|| if audio { "anull" } else { "null" }.to_string());
        self.chains.push(format!("{}{}{}", pads(inputs), body, pads(outputs)));
        self
    }

    /// Appends a single-filter chain.
    #[must_use]
    pub fn node(self, inputs: &[&str], filter: impl Into<String>, outputs: &[&str]) -> Self {
        self.chain(inputs, FilterChain::new().add(filter), outputs)
    }

    #[must_use]
    pub fn build(self) -> String {
        self.chains.join(";")
    }
}

fn pads(labels: &[&str]) -> String {
    labels.iter().map(|label| format!("[{label}]")).collect()
}
