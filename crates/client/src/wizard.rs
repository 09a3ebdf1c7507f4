//! The six-stage listing wizard as an explicit state machine.
//!
//! `Photos -> Details -> Condition -> Pricing -> Shipping -> Review`, linear,
//! no skipping. Forward navigation is gated by [`can_advance`]; `Back` is
//! always allowed and never clears entered fields. The terminal Publish is
//! an action, not a stage: the async submission lives in
//! [`crate::api::ApiClient`], which feeds `PublishSucceeded` or
//! `PublishFailed` back into the reducer.
//!
//! The whole machine is a value - [`WizardState`] advanced by
//! [`WizardState::apply`] - so every transition and guard is testable
//! without any UI attached.

use std::collections::BTreeSet;

use vintly_core::{Condition, ListingCategory, Price, ShippingWeight, Size};

/// Maximum number of photos per listing; the first photo is the cover.
pub const MAX_PHOTOS: usize = 8;

/// The wizard's six stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Photos,
    Details,
    Condition,
    Pricing,
    Shipping,
    Review,
}

impl Stage {
    /// All stages in flow order.
    pub const ALL: [Self; 6] = [
        Self::Photos,
        Self::Details,
        Self::Condition,
        Self::Pricing,
        Self::Shipping,
        Self::Review,
    ];

    /// 1-based stage number as shown in the progress bar.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Photos => 1,
            Self::Details => 2,
            Self::Condition => 3,
            Self::Pricing => 4,
            Self::Shipping => 5,
            Self::Review => 6,
        }
    }

    /// Title shown in the progress bar.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Photos => "Photos",
            Self::Details => "Details",
            Self::Condition => "Condition",
            Self::Pricing => "Pricing",
            Self::Shipping => "Shipping",
            Self::Review => "Review",
        }
    }

    const fn next(self) -> Option<Self> {
        match self {
            Self::Photos => Some(Self::Details),
            Self::Details => Some(Self::Condition),
            Self::Condition => Some(Self::Pricing),
            Self::Pricing => Some(Self::Shipping),
            Self::Shipping => Some(Self::Review),
            Self::Review => None,
        }
    }

    const fn prev(self) -> Option<Self> {
        match self {
            Self::Photos => None,
            Self::Details => Some(Self::Photos),
            Self::Condition => Some(Self::Details),
            Self::Pricing => Some(Self::Condition),
            Self::Shipping => Some(Self::Pricing),
            Self::Review => Some(Self::Shipping),
        }
    }
}

/// The in-progress listing accumulated across stages.
///
/// Lives only in the wizard; nothing is persisted until Publish succeeds.
/// `enhanced` holds the indexes of photos that went through the enhancement
/// round trip; it is kept aligned with `photos` across removals and
/// reorders.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub photos: Vec<String>,
    pub enhanced: BTreeSet<usize>,
    pub title: String,
    pub description: String,
    pub category: Option<ListingCategory>,
    pub size: Option<Size>,
    pub condition: Option<Condition>,
    pub brand: String,
    pub color: String,
    pub price: String,
    pub shipping_weight: Option<ShippingWeight>,
    pub allow_pickup: bool,
    pub allow_delivery: bool,
    pub shipping_included: bool,
    pub pickup_location: String,
}

impl Default for ListingDraft {
    fn default() -> Self {
        Self {
            photos: Vec::new(),
            enhanced: BTreeSet::new(),
            title: String::new(),
            description: String::new(),
            category: None,
            size: None,
            condition: None,
            brand: String::new(),
            color: String::new(),
            price: String::new(),
            shipping_weight: None,
            allow_pickup: false,
            // Delivery is the pre-selected fulfillment method.
            allow_delivery: true,
            shipping_included: false,
            pickup_location: String::new(),
        }
    }
}

impl ListingDraft {
    /// The parsed price, if the field currently holds a valid number.
    #[must_use]
    pub fn parsed_price(&self) -> Option<Price> {
        Price::parse(&self.price).ok()
    }
}

/// Whether the Continue control is enabled on `stage` for `draft`.
///
/// Pure predicate; evaluated before every forward transition.
#[must_use]
pub fn can_advance(stage: Stage, draft: &ListingDraft) -> bool {
    match stage {
        Stage::Photos => !draft.photos.is_empty(),
        Stage::Details => {
            !draft.title.is_empty()
                && draft.category.is_some()
                && draft.size.is_some()
                && !draft.brand.is_empty()
        }
        Stage::Condition => draft.condition.is_some(),
        Stage::Pricing => {
            draft.parsed_price().is_some_and(|p| p.is_positive())
                && draft.shipping_weight.is_some()
        }
        // At least one fulfillment method must be selected.
        Stage::Shipping => draft.allow_pickup || draft.allow_delivery,
        Stage::Review => true,
    }
}

/// Everything that can happen to the wizard.
#[derive(Debug, Clone)]
pub enum WizardAction {
    /// Advance one stage; ignored unless the current stage's gate passes.
    Next,
    /// Go back one stage; always allowed, never clears fields.
    Back,
    /// Append photos, capped at [`MAX_PHOTOS`].
    AddPhotos(Vec<String>),
    /// Remove the photo at an index, realigning enhancement flags.
    RemovePhoto(usize),
    /// Drag-reorder a photo; enhancement flags follow their photos.
    MovePhoto { from: usize, to: usize },
    /// Swap in the enhanced rendition of a photo.
    ReplacePhoto { index: usize, data: String },
    /// Flag a photo as having been enhanced.
    MarkEnhanced(usize),
    SetTitle(String),
    SetDescription(String),
    SetCategory(ListingCategory),
    SetSize(Size),
    SetCondition(Condition),
    SetBrand(String),
    SetColor(String),
    SetPrice(String),
    SetShippingWeight(ShippingWeight),
    SetAllowPickup(bool),
    SetAllowDelivery(bool),
    SetShippingIncluded(bool),
    SetPickupLocation(String),
    /// The Publish request went out.
    PublishStarted,
    /// The product service accepted the draft.
    PublishSucceeded,
    /// The product service rejected the draft; stay on Review with an
    /// inline error.
    PublishFailed(String),
    /// "List Another": fresh draft, back to stage one.
    Reset,
}

/// The wizard as a value: current stage, draft, and submission status.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    pub stage: Stage,
    pub draft: ListingDraft,
    /// A Publish request is in flight.
    pub submitting: bool,
    /// Publish succeeded; the UI shows the success screen.
    pub published: bool,
    /// Inline error from the last failed Publish.
    pub error: Option<String>,
}

impl WizardState {
    /// A fresh wizard: stage one, empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stage: Stage::Photos,
            draft: ListingDraft::default(),
            submitting: false,
            published: false,
            error: None,
        }
    }

    /// Whether the current stage's gate passes.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        can_advance(self.stage, &self.draft)
    }

    /// Apply one action, the single transition function for the whole flow.
    pub fn apply(&mut self, action: WizardAction) {
        match action {
            WizardAction::Next => {
                if self.can_advance()
                    && let Some(next) = self.stage.next()
                {
                    self.stage = next;
                }
            }
            WizardAction::Back => {
                if let Some(prev) = self.stage.prev() {
                    self.stage = prev;
                }
            }
            WizardAction::AddPhotos(photos) => {
                let remaining = MAX_PHOTOS.saturating_sub(self.draft.photos.len());
                self.draft.photos.extend(photos.into_iter().take(remaining));
            }
            WizardAction::RemovePhoto(index) => self.remove_photo(index),
            WizardAction::MovePhoto { from, to } => self.move_photo(from, to),
            WizardAction::ReplacePhoto { index, data } => {
                if let Some(photo) = self.draft.photos.get_mut(index) {
                    *photo = data;
                }
            }
            WizardAction::MarkEnhanced(index) => {
                if index < self.draft.photos.len() {
                    self.draft.enhanced.insert(index);
                }
            }
            WizardAction::SetTitle(title) => self.draft.title = title,
            WizardAction::SetDescription(description) => self.draft.description = description,
            WizardAction::SetCategory(category) => self.draft.category = Some(category),
            WizardAction::SetSize(size) => self.draft.size = Some(size),
            WizardAction::SetCondition(condition) => self.draft.condition = Some(condition),
            WizardAction::SetBrand(brand) => self.draft.brand = brand,
            WizardAction::SetColor(color) => self.draft.color = color,
            WizardAction::SetPrice(price) => self.draft.price = price,
            WizardAction::SetShippingWeight(weight) => self.draft.shipping_weight = Some(weight),
            WizardAction::SetAllowPickup(allow) => self.draft.allow_pickup = allow,
            WizardAction::SetAllowDelivery(allow) => self.draft.allow_delivery = allow,
            WizardAction::SetShippingIncluded(included) => {
                self.draft.shipping_included = included;
            }
            WizardAction::SetPickupLocation(location) => self.draft.pickup_location = location,
            WizardAction::PublishStarted => {
                self.submitting = true;
                self.error = None;
            }
            WizardAction::PublishSucceeded => {
                self.submitting = false;
                self.published = true;
            }
            WizardAction::PublishFailed(message) => {
                self.submitting = false;
                self.error = Some(message);
            }
            WizardAction::Reset => *self = Self::new(),
        }
    }

    /// Remove a photo and shift every enhancement flag above it down by
    /// one, so flags stay attached to the photos they describe.
    fn remove_photo(&mut self, index: usize) {
        if index >= self.draft.photos.len() {
            return;
        }
        self.draft.photos.remove(index);
        self.draft.enhanced = self
            .draft
            .enhanced
            .iter()
            .filter(|&&flag| flag != index)
            .map(|&flag| if flag > index { flag - 1 } else { flag })
            .collect();
    }

    /// Reorder a photo, remapping enhancement flags through the same
    /// remove-then-insert the photo vector undergoes.
    fn move_photo(&mut self, from: usize, to: usize) {
        let len = self.draft.photos.len();
        if from >= len || from == to {
            return;
        }
        let to = to.min(len - 1);

        let photo = self.draft.photos.remove(from);
        self.draft.photos.insert(to, photo);

        self.draft.enhanced = self
            .draft
            .enhanced
            .iter()
            .map(|&flag| {
                if flag == from {
                    to
                } else {
                    let after_remove = if flag > from { flag - 1 } else { flag };
                    if after_remove >= to {
                        after_remove + 1
                    } else {
                        after_remove
                    }
                }
            })
            .collect();
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}
