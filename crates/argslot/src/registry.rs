use crate::classify::Classification;
use crate::matcher::Matcher;
use crate::slot::Slot;

/// Stable handle to a slot inside a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

#[derive(Debug)]
struct Entry<'a> {
    matcher: Matcher<'a>,
    slot: SlotId,
}

/// Owns every slot and every (matcher, slot) association, bucketed by
/// classification. Lookup within a bucket is insertion ordered.
#[derive(Debug, Default)]
pub struct Registry<'a> {
    slots: Vec<Slot<'a>>,
    buckets: [Vec<Entry<'a>>; 3],
}

impl<'a> Registry<'a> {
    /// Add a slot together with all of its matchers.
    pub fn insert(&mut self, slot: Slot<'a>, matchers: Vec<Matcher<'a>>) -> SlotId {
        let id = SlotId(self.slots.len());
        self.slots.push(slot);
        for matcher in matchers {
            self.buckets[matcher.class().index()].push(Entry { matcher, slot: id });
        }
        id
    }

    /// First slot whose matcher in `class`'s bucket accepts `token`.
    pub fn resolve(&self, class: Classification, token: &str) -> Option<SlotId> {
        self.buckets[class.index()]
            .iter()
            .find(|e| e.matcher.matches(token))
            .map(|e| e.slot)
    }

    pub fn slot(&self, id: SlotId) -> &Slot<'a> {
        &self.slots[id.0]
    }

    pub fn slot_mut(&mut self, id: SlotId) -> &mut Slot<'a> {
        &mut self.slots[id.0]
    }

    pub fn slots(&self) -> &[Slot<'a>] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of matchers registered under `class`.
    pub(crate) fn bucket_len(&self, class: Classification) -> usize {
        self.buckets[class.index()].len()
    }

    pub(crate) fn has_positional(&self) -> bool {
        self.slots.iter().any(|s| s.positional().is_some())
    }

    /// First positional slot, in registration order, that can take a bare token.
    pub(crate) fn next_positional(&self) -> Option<SlotId> {
        self.slots
            .iter()
            .position(|s| s.accepts_positional())
            .map(SlotId)
    }

    /// Close adjacent positional runs of every slot except `keep`.
    pub(crate) fn interrupt_positionals(&mut self, keep: Option<SlotId>) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if keep != Some(SlotId(idx)) {
                slot.interrupt_positional();
            }
        }
    }
}
