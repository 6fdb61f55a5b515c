/// One page of a bucket listing
#[must_use = "a listing page carries the continuation needed to fetch the rest of the bucket"]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectPage {
    /// Keys on this page, in store order
    pub keys: Vec<String>,
    /// Token for the next page; `None` once the listing is exhausted
    pub next_continuation: Option<String>,
}

impl ObjectPage {
    /// Returns true if more pages follow this one
    pub fn has_more(&self) -> bool {
        self.next_continuation.is_some()
    }
}
