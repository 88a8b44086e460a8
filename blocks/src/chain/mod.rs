use crate::block::Block;

/// Iterator over a singly-linked statement sequence, following `next`
/// links from the head block.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    current: Option<&'a Block>,
}

impl<'a> Chain<'a> {
    pub fn new(head: Option<&'a Block>) -> Self {
        Chain { current: head }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.current?;
        self.current = block.next.as_deref();
        Some(block)
    }
}
