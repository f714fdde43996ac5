use std::collections::HashMap;

/// A live chart that must be torn down before its slot is reused.
pub trait ChartHandle {
    fn destroy(&mut self);
}

/// Slot id to live chart. A slot never holds more than one chart.
#[derive(Debug)]
pub struct ChartRegistry<C: ChartHandle> {
    slots: HashMap<String, C>,
}

impl<C: ChartHandle> Default for ChartRegistry<C> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<C: ChartHandle> ChartRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `chart` in `slot`, destroying whatever occupied it first.
    pub fn install(&mut self, slot: &str, chart: C) -> &mut C {
        self.destroy(slot);
        self.slots.entry(slot.to_string()).or_insert(chart)
    }

    /// Returns `true` when a chart was present and destroyed.
    pub fn destroy(&mut self, slot: &str) -> bool {
        match self.slots.remove(slot) {
            Some(mut previous) => {
                previous.destroy();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, slot: &str) -> Option<&C> {
        self.slots.get(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
