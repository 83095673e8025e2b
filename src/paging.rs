use crate::models::Paging;

/// Position within a paged search.
///
/// Invariant: another page is requested only while `offset < total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub offset: u64,
    pub limit: u32,
}

impl PageCursor {
    pub fn new(limit: u32) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
        }
    }

    pub fn params(&self) -> [(&'static str, String); 2] {
        [
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ]
    }

    /// Moves past the page just received. Returns whether another page remains.
    pub fn advance(&mut self, received: usize, paging: Option<Paging>) -> bool {
        self.offset += u64::from(self.limit);
        match paging.and_then(|p| p.total) {
            Some(total) => received > 0 && self.offset < total,
            None => false,
        }
    }
}
