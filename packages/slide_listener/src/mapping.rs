use std::collections::HashMap;

/// Index reported for slides the mapping does not know.
pub const DEFAULT_SLIDE_INDEX: usize = 1;

/// Maps presentation slide object ids (`g12345`) to 1-based slide indices and
/// remembers which slide is showing.
#[derive(Clone, Debug)]
pub struct SlideMapping {
    id_to_index: HashMap<String, usize>,
    current_slide_id: Option<String>,
    current_slide_index: usize,
}

impl Default for SlideMapping {
    fn default() -> Self {
        Self::new()
    }
}

impl SlideMapping {
    pub fn new() -> Self {
        Self {
            id_to_index: HashMap::new(),
            current_slide_id: None,
            current_slide_index: DEFAULT_SLIDE_INDEX,
        }
    }

    /// Mapping where the n-th id (starting at 1) is slide n.
    pub fn from_ordered_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut mapping = Self::new();
        for (i, id) in ids.into_iter().enumerate() {
            mapping.add_mapping(id, i + 1);
        }
        mapping
    }

    pub fn add_mapping(&mut self, slide_id: impl Into<String>, index: usize) {
        self.id_to_index.insert(slide_id.into(), index);
    }

    /// Record `slide_id` as showing and return its index.
    pub fn update_current_slide(&mut self, slide_id: &str) -> usize {
        self.current_slide_index = self
            .id_to_index
            .get(slide_id)
            .copied()
            .unwrap_or(DEFAULT_SLIDE_INDEX);
        self.current_slide_id = Some(slide_id.to_string());
        self.current_slide_index
    }

    pub fn current_slide_id(&self) -> Option<&str> {
        self.current_slide_id.as_deref()
    }

    pub fn current_slide_index(&self) -> usize {
        self.current_slide_index
    }

    pub fn len(&self) -> usize {
        self.id_to_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_index.is_empty()
    }
}
