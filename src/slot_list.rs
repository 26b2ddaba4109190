//! Arena-backed circular doubly-linked list.
//!
//! The registry substrate. Nodes live in a slot arena and are addressed by
//! stable [`NodeIndex`] handles; each slot carries explicit `next`/`prev`
//! indices, so insertion and removal are O(1) without raw pointer aliasing.
//! Slot 0 is the sentinel head. A node whose links both refer to itself is
//! **detached**; a list whose sentinel self-loops is **empty**.
//!
//! The list never drops values on removal - it only rewires indices. Callers
//! that embed records here (the subsystem registry) keep them for the process
//! lifetime.

/// Index of the sentinel slot.
const HEAD: usize = 0 ;

/// Marker written into a removed node's links. Out of range for any arena,
/// so reusing a removed node without resetting it faults loudly instead of
/// corrupting its neighbours.
const POISONED: usize = usize::MAX ;

/// Stable handle to a slot in a [`SlotList`].
///
/// Handles are only meaningful for the list that allocated them.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub struct NodeIndex( pub(crate) usize );

struct Slot<T> {
    next: usize,
    prev: usize,
    /// `None` only for the sentinel.
    value: Option<T>,
}

/// Circular doubly-linked list over an arena of slots.
pub struct SlotList<T> {
    slots: Vec<Slot<T>>,
}

impl<T> SlotList<T> {

    /// Creates an empty list. The sentinel is allocated on first use so this
    /// can initialise a `static`.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    fn ensure_head( &mut self ) {
        if self.slots.is_empty() {
            self.slots.push( Slot { next: HEAD, prev: HEAD, value: None });
        }
    }

    /// Appends a detached slot holding `value` and returns its handle.
    pub fn alloc( &mut self, value: T ) -> NodeIndex {
        self.ensure_head();
        let index = self.slots.len();
        self.slots.push( Slot { next: index, prev: index, value: Some( value ) });
        NodeIndex( index )
    }

    /// Returns whether `node` is a live handle into this list.
    #[must_use]
    pub fn contains( &self, node: NodeIndex ) -> bool {
        node.0 != HEAD && self.slots.get( node.0 ).is_some_and(| slot | slot.value.is_some() )
    }

    /// Borrows the value held by `node`, if the handle is live.
    #[must_use]
    pub fn get( &self, node: NodeIndex ) -> Option<&T> {
        self.slots.get( node.0 ).and_then(| slot | slot.value.as_ref() )
    }

    /// Mutably borrows the value held by `node`, if the handle is live.
    pub fn get_mut( &mut self, node: NodeIndex ) -> Option<&mut T> {
        self.slots.get_mut( node.0 ).and_then(| slot | slot.value.as_mut() )
    }

    /// O(1) sentinel self-loop check.
    #[must_use]
    pub fn is_empty( &self ) -> bool {
        self.slots.first().is_none_or(| head | head.next == HEAD )
    }

    /// O(1) node self-loop check. A node is detached when it was never
    /// inserted, or was removed through [`SlotList::remove_and_reset`].
    #[must_use]
    pub fn is_detached( &self, node: NodeIndex ) -> bool {
        self.slots.get( node.0 ).is_some_and(| slot | slot.next == node.0 && slot.prev == node.0 )
    }

    /// Number of linked nodes. O(n), diagnostic use.
    #[must_use]
    pub fn len( &self ) -> usize {
        self.iter().count()
    }

    fn link( &mut self, prev: usize, next: usize, node: usize ) {
        // `node`'s links are overwritten regardless of prior content.
        self.slots[node].prev = prev ;
        self.slots[node].next = next ;
        self.slots[prev].next = node ;
        self.slots[next].prev = node ;
    }

    /// Links `node` directly after `existing`, which must already be a member
    /// (or the position reached through [`SlotList::push_front`]).
    pub fn insert_after( &mut self, existing: NodeIndex, node: NodeIndex ) {
        let next = self.slots[existing.0].next ;
        self.link( existing.0, next, node.0 );
    }

    /// Links `node` directly before `existing`, which must already be a member.
    pub fn insert_before( &mut self, existing: NodeIndex, node: NodeIndex ) {
        let prev = self.slots[existing.0].prev ;
        self.link( prev, existing.0, node.0 );
    }

    /// Links `node` at the head of the list.
    pub fn push_front( &mut self, node: NodeIndex ) {
        let next = self.slots[HEAD].next ;
        self.link( HEAD, next, node.0 );
    }

    /// Links `node` at the tail of the list.
    pub fn push_back( &mut self, node: NodeIndex ) {
        let prev = self.slots[HEAD].prev ;
        self.link( prev, HEAD, node.0 );
    }

    /// Unlinks `node` from the list and poisons its links.
    ///
    /// A second `remove` of the same node is a programming error and panics
    /// rather than silently corrupting the list. Use
    /// [`SlotList::remove_and_reset`] where teardown must be idempotent.
    ///
    /// # Panics
    /// Panics if `node` was already removed without an intervening reset.
    pub fn remove( &mut self, node: NodeIndex ) {
        let Slot { next, prev, .. } = self.slots[node.0] ;
        assert!( next != POISONED && prev != POISONED, "node removed twice without reset" );
        self.slots[prev].next = next ;
        self.slots[next].prev = prev ;
        self.slots[node.0].next = POISONED ;
        self.slots[node.0].prev = POISONED ;
    }

    /// Unlinks `node` (if linked) and resets it to the detached self-loop.
    ///
    /// Idempotent: safe on detached and already-removed nodes, after which
    /// the node may be reinserted.
    pub fn remove_and_reset( &mut self, node: NodeIndex ) {
        let Slot { next, prev, .. } = self.slots[node.0] ;
        if next != POISONED && prev != POISONED && next != node.0 {
            self.slots[prev].next = next ;
            self.slots[next].prev = prev ;
        }
        self.slots[node.0].next = node.0 ;
        self.slots[node.0].prev = node.0 ;
    }

    /// First linked node, if any.
    #[must_use]
    pub fn first( &self ) -> Option<NodeIndex> {
        let head = self.slots.first()?;
        match head.next {
            HEAD => None,
            next => Some( NodeIndex( next )),
        }
    }

    /// Last linked node, if any.
    #[must_use]
    pub fn last( &self ) -> Option<NodeIndex> {
        let head = self.slots.first()?;
        match head.prev {
            HEAD => None,
            prev => Some( NodeIndex( prev )),
        }
    }

    /// Node following `node`, or `None` at the tail or on a removed node.
    #[must_use]
    pub fn successor( &self, node: NodeIndex ) -> Option<NodeIndex> {
        match self.slots.get( node.0 )?.next {
            HEAD | POISONED => None,
            next => Some( NodeIndex( next )),
        }
    }

    /// Node preceding `node`, or `None` at the front or on a removed node.
    #[must_use]
    pub fn predecessor( &self, node: NodeIndex ) -> Option<NodeIndex> {
        match self.slots.get( node.0 )?.prev {
            HEAD | POISONED => None,
            prev => Some( NodeIndex( prev )),
        }
    }

    /// Lazy forward traversal from head to tail.
    pub fn iter( &self ) -> Iter<'_, T> {
        Iter { list: self, current: self.first() }
    }

    /// Removal-safe traversal: each node's successor is captured before the
    /// node is yielded, so `visit` may remove the node it was handed without
    /// corrupting the walk.
    pub fn for_each_node( &mut self, mut visit: impl FnMut( &mut Self, NodeIndex )) {
        let mut current = self.first();
        while let Some( node ) = current {
            current = self.successor( node );
            visit( self, node );
        }
    }

}

impl<T> Default for SlotList<T> {
    fn default() -> Self { Self::new() }
}

/// Forward iterator over linked nodes. See [`SlotList::iter`].
pub struct Iter<'a, T> {
    list: &'a SlotList<T>,
    current: Option<NodeIndex>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = ( NodeIndex, &'a T );

    fn next( &mut self ) -> Option<Self::Item> {
        let node = self.current?;
        self.current = self.list.successor( node );
        Some(( node, self.list.get( node )? ))
    }
}
