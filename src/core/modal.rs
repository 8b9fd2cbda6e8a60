//! Modal registry.
//!
//! Any part of the console asks for a dialog by pushing typed props into a
//! [`ModalStore`]; the renderer walks [`ModalStore::instances`] in insertion
//! order and draws whatever is registered. Operations on ids that are no
//! longer open are ignored.

use crate::domain::model::{Bid, Buyer, Group, Resource};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalId(u64);

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "modal-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    ConfirmDelete,
    BuyerDetails,
    GroupForm,
    BidDecision,
    ExportProgress,
}

/// Props for each dialog the console can show.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalProps {
    ConfirmDelete {
        resource: Resource,
        id: String,
        label: String,
    },
    BuyerDetails {
        buyer: Buyer,
    },
    /// `None` opens the form in create mode.
    GroupForm {
        group: Option<Group>,
    },
    BidDecision {
        bid: Bid,
    },
    ExportProgress {
        resource: Resource,
        done: bool,
    },
}

impl ModalProps {
    pub fn kind(&self) -> ModalKind {
        match self {
            ModalProps::ConfirmDelete { .. } => ModalKind::ConfirmDelete,
            ModalProps::BuyerDetails { .. } => ModalKind::BuyerDetails,
            ModalProps::GroupForm { .. } => ModalKind::GroupForm,
            ModalProps::BidDecision { .. } => ModalKind::BidDecision,
            ModalProps::ExportProgress { .. } => ModalKind::ExportProgress,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalSize {
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalOptions {
    pub size: ModalSize,
    pub dismissible: bool,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            size: ModalSize::Md,
            dismissible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalInstance {
    pub id: ModalId,
    pub props: ModalProps,
    pub options: ModalOptions,
}

impl ModalInstance {
    pub fn kind(&self) -> ModalKind {
        self.props.kind()
    }
}

#[derive(Debug, Default)]
pub struct ModalStore {
    next_id: u64,
    instances: Vec<ModalInstance>,
}

impl ModalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, props: ModalProps, options: ModalOptions) -> ModalId {
        self.next_id += 1;
        let id = ModalId(self.next_id);
        tracing::debug!("Opening {} ({:?})", id, props.kind());
        self.instances.push(ModalInstance { id, props, options });
        id
    }

    /// Returns whether an instance was actually removed.
    pub fn close(&mut self, id: ModalId) -> bool {
        let before = self.instances.len();
        self.instances.retain(|m| m.id != id);
        let removed = self.instances.len() != before;
        if removed {
            tracing::debug!("Closed {}", id);
        }
        removed
    }

    /// Applies `patch` to the props of an open modal. Returns false when `id`
    /// is gone.
    pub fn update<F>(&mut self, id: ModalId, patch: F) -> bool
    where
        F: FnOnce(&mut ModalProps),
    {
        match self.instances.iter_mut().find(|m| m.id == id) {
            Some(instance) => {
                patch(&mut instance.props);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: ModalId) -> Option<&ModalInstance> {
        self.instances.iter().find(|m| m.id == id)
    }

    /// The modal drawn last, i.e. on top.
    pub fn top(&self) -> Option<&ModalInstance> {
        self.instances.last()
    }

    /// Escape-key behaviour: closes the top modal if it is dismissible.
    pub fn close_top(&mut self) -> Option<ModalId> {
        let top = self.instances.last()?;
        if !top.options.dismissible {
            return None;
        }
        let id = top.id;
        self.close(id);
        Some(id)
    }

    pub fn close_all(&mut self) {
        self.instances.clear();
    }

    /// Render order.
    pub fn instances(&self) -> &[ModalInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
