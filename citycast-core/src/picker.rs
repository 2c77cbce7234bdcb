use crate::model::LocationCandidate;

/// One displayable row of the candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerRow {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
}

impl std::fmt::Display for PickerRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.name, self.country)?;
        if let Some(state) = &self.state {
            write!(f, " ({state})")?;
        }
        Ok(())
    }
}

/// Holds the candidates of the latest successful lookup.
#[derive(Debug, Clone, Default)]
pub struct LocationPicker {
    candidates: Option<Vec<LocationCandidate>>,
}

impl LocationPicker {
    /// Replaces the previous list wholesale.
    pub fn replace(&mut self, candidates: Vec<LocationCandidate>) {
        self.candidates = Some(candidates);
    }

    /// `false` until a lookup has emitted, even an empty one.
    pub fn has_results(&self) -> bool {
        self.candidates.is_some()
    }

    pub fn candidates(&self) -> &[LocationCandidate] {
        self.candidates.as_deref().unwrap_or_default()
    }

    pub fn rows(&self) -> Vec<PickerRow> {
        self.candidates()
            .iter()
            .map(|c| PickerRow {
                name: c.name.clone(),
                country: c.country.clone(),
                state: c.state.clone(),
            })
            .collect()
    }

    /// Selecting a row hands the full record to `on_select` right away.
    /// Returns `false` when `index` is out of range.
    pub fn choose<F>(&self, index: usize, on_select: F) -> bool
    where
        F: FnOnce(&LocationCandidate),
    {
        match self.candidates().get(index) {
            Some(candidate) => {
                on_select(candidate);
                true
            }
            None => false,
        }
    }
}
