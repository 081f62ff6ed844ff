//! FIFO work-list used to drive leaves-before-parents traversals.

/// A first-in, first-out queue with amortized O(1) `push` and `pop`.
///
/// Built from two vectors using only append and remove-last:
/// - `incoming` receives every `push`.
/// - `outgoing` holds the next items in reverse, so its last element is the head.
///
/// When `outgoing` runs dry, `incoming` is reversed in one pass and the two
/// vectors swap roles. Each item is moved at most twice.
#[derive(Debug, Clone)]
pub struct WorkQueue<T> {
    incoming: Vec<T>,
    outgoing: Vec<T>,
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    /// Append an item at the tail.
    pub fn push(&mut self, item: T) {
        self.incoming.push(item);
    }

    /// Remove and return the head, or `None` when the queue is empty.
    pub fn pop(&mut self) -> Option<T> {
        if let Some(item) = self.outgoing.pop() {
            return Some(item);
        }
        if self.incoming.is_empty() {
            return None;
        }
        self.incoming.reverse();
        std::mem::swap(&mut self.incoming, &mut self.outgoing);
        self.outgoing.pop()
    }

    pub fn len(&self) -> usize {
        self.incoming.len() + self.outgoing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed the queue with `items`; they pop in their original order.
impl<T> From<Vec<T>> for WorkQueue<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            incoming: items,
            outgoing: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_empty() {
        let mut queue: WorkQueue<u32> = WorkQueue::new();
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = WorkQueue::new();
        for i in 0..5 {
            queue.push(i);
        }
        assert_eq!(queue.len(), 5);

        let drained: Vec<_> = std::iter::from_fn(|| queue.pop()).collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_interleaved_push_pop() {
        // Pushes that land while `outgoing` still has items must wait their turn
        let mut queue = WorkQueue::new();
        queue.push('a');
        queue.push('b');
        assert_eq!(queue.pop(), Some('a'));

        queue.push('c');
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some('b'));

        queue.push('d');
        assert_eq!(queue.pop(), Some('c'));
        assert_eq!(queue.pop(), Some('d'));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_from_vec_keeps_order() {
        let mut queue = WorkQueue::from(vec![3, 1, 2]);
        queue.push(9);
        assert_eq!(queue.len(), 4);
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(9));
    }

    #[test]
    fn test_len_counts_both_sides() {
        let mut queue = WorkQueue::from(vec![1, 2, 3]);
        // First pop moves everything into `outgoing`
        queue.pop();
        queue.push(4);
        queue.push(5);
        assert_eq!(queue.len(), 4);
    }
}
