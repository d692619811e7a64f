use catalog_types::{EntityId, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Closed,
    Creating,
    Editing(EntityId),
}

/// Transient, user-editable copy of one record.
///
/// Every close (cancel or successful save) resets the value to the
/// template, so the next open never sees leftovers.
#[derive(Debug, Clone)]
pub struct EditBuffer<T> {
    template: T,
    value: T,
    mode: EditMode,
}

impl<T: Resource + Default> Default for EditBuffer<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Resource> EditBuffer<T> {
    /// Buffer that resets to `template`.
    pub fn new(template: T) -> Self {
        Self {
            value: template.clone(),
            template,
            mode: EditMode::Closed,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != EditMode::Closed
    }

    /// Id of the record being edited, if any.
    pub fn editing_id(&self) -> Option<EntityId> {
        match self.mode {
            EditMode::Editing(id) => Some(id),
            _ => None,
        }
    }

    /// Start a new record from the template.
    pub fn open_new(&mut self) -> &mut T {
        self.value = self.template.clone();
        self.mode = EditMode::Creating;
        &mut self.value
    }

    /// Start editing a copy of `item`.
    pub fn open_edit(&mut self, item: &T) -> &mut T {
        self.value = item.clone();
        self.mode = EditMode::Editing(item.id());
        &mut self.value
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn template(&self) -> &T {
        &self.template
    }

    pub fn close(&mut self) {
        self.value = self.template.clone();
        self.mode = EditMode::Closed;
    }
}
