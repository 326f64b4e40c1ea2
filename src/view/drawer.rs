use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::render::{LineView, price_label, total_label};
use super::{CartSnapshot, CheckoutDialog, CheckoutPhase, TimerId, Timers, Toast};
use crate::cart::{CartItem, CartStore};
use crate::catalog::Catalog;
use crate::config::{CartConfig, Timing};
use crate::event::{CartEvent, EventSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewTimer {
    DismissToast { toast_id: u64 },
    CloseCheckout { generation: u64 },
}

/// The cart drawer.
///
/// Renders a [`CartStore`], dispatches its mutations, and owns the purely
/// visual state: the remove-all confirmation, the checkout dialog and the
/// current notification. Time only moves when the owner calls
/// [`advance`](Self::advance).
///
/// Once [`unmount`](Self::unmount)ed the view ignores every call, including
/// timers that were pending at teardown.
#[derive(Debug)]
pub struct CartView {
    dialog: CheckoutDialog,
    remove_all_prompt: bool,
    toast: Option<Toast>,
    toast_timer: Option<TimerId>,
    toast_seq: u64,
    timers: Timers<ViewTimer>,
    mounted: bool,
    timing: Timing,
    currency_symbol: String,
    events: EventSender,
}

impl CartView {
    pub fn new(config: &CartConfig) -> Self {
        Self {
            dialog: CheckoutDialog::new(),
            remove_all_prompt: false,
            toast: None,
            toast_timer: None,
            toast_seq: 0,
            timers: Timers::new(),
            mounted: true,
            timing: config.timing,
            currency_symbol: config.currency_symbol.clone(),
            events: EventSender::noop(),
        }
    }

    /// Set the event sender.
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = events;
        self
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn checkout_phase(&self) -> CheckoutPhase {
        self.dialog.phase()
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn is_remove_all_prompt_open(&self) -> bool {
        self.remove_all_prompt
    }

    pub fn render(&self, store: &CartStore, catalog: &Catalog) -> CartSnapshot {
        let lines = store
            .items()
            .iter()
            .map(|item| LineView {
                id: item.id.clone(),
                title: item.title.clone(),
                instructor: item.instructor.clone(),
                thumbnail: catalog.thumbnail(&item.id).to_string(),
                price: item.price,
                price_label: price_label(item.price, &self.currency_symbol),
            })
            .collect();
        let total = store.total();

        CartSnapshot {
            lines,
            total,
            total_label: total_label(total, &self.currency_symbol),
            remove_all_prompt: self.remove_all_prompt,
            checkout: self.dialog.phase(),
            toast: self.toast.clone(),
        }
    }

    /// Add an item and announce it.
    pub fn add(&mut self, store: &mut CartStore, item: CartItem, now: Instant) -> bool {
        if !self.mounted {
            return false;
        }
        let title = item.title.clone();
        let added = store.add(item);
        if added {
            self.toast_seq += 1;
            let toast = Toast::added(self.toast_seq, &title);
            self.show_toast(toast, self.timing.toast(), now);
        }
        added
    }

    /// Remove an item via its row control and announce it.
    pub fn remove(&mut self, store: &mut CartStore, id: &str, now: Instant) -> bool {
        if !self.mounted {
            return false;
        }
        match store.remove(id) {
            Some(item) => {
                self.toast_seq += 1;
                let toast = Toast::removed(self.toast_seq, &item.title);
                self.show_toast(toast, self.timing.toast(), now);
                true
            }
            None => false,
        }
    }

    /// Show the "remove all" confirmation. Does not touch the cart.
    pub fn request_remove_all(&mut self, store: &CartStore) -> bool {
        if !self.mounted || store.is_empty() || self.remove_all_prompt {
            return false;
        }
        self.remove_all_prompt = true;
        true
    }

    pub fn cancel_remove_all(&mut self) -> bool {
        if !self.mounted || !self.remove_all_prompt {
            return false;
        }
        self.remove_all_prompt = false;
        true
    }

    /// Clear the cart, but only after the confirmation was shown.
    pub fn confirm_remove_all(&mut self, store: &mut CartStore) -> bool {
        if !self.mounted || !self.remove_all_prompt {
            return false;
        }
        self.remove_all_prompt = false;
        let item_count = store.clear();
        debug!(item_count, "cart abandoned");
        self.events.emit(CartEvent::CartAbandoned { item_count });
        true
    }

    /// Closed -> Reviewing. Needs a non-empty cart.
    pub fn open_checkout(&mut self, store: &CartStore) -> bool {
        if !self.mounted || store.is_empty() {
            return false;
        }
        let opened = self.dialog.open();
        if opened {
            self.phase_changed();
        }
        opened
    }

    /// "Continue shopping" or the close control.
    pub fn cancel_checkout(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        let closed = self.dialog.cancel();
        if closed {
            self.phase_changed();
        }
        closed
    }

    /// Reviewing -> Succeeded: empties the cart once and schedules the
    /// dialog to close.
    pub fn buy(&mut self, store: &mut CartStore, now: Instant) -> bool {
        if !self.mounted {
            return false;
        }
        let Some(generation) = self.dialog.succeed() else {
            return false;
        };

        let total = store.total();
        let item_count = store.clear();
        info!(item_count, total = %total, "purchase completed");
        self.events
            .emit(CartEvent::PurchaseCompleted { item_count, total });
        self.phase_changed();

        self.timers.schedule(
            now,
            self.timing.success_close(),
            ViewTimer::CloseCheckout { generation },
        );
        self.toast_seq += 1;
        let toast = Toast::purchased(self.toast_seq);
        self.show_toast(toast, self.timing.purchase_toast(), now);
        true
    }

    /// Earliest pending timer, for runtimes that sleep between inputs.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.mounted {
            self.timers.next_deadline()
        } else {
            None
        }
    }

    /// Fire every timer due at `now`. Returns how many fired.
    pub fn advance(&mut self, now: Instant) -> usize {
        if !self.mounted {
            return 0;
        }
        let due = self.timers.take_due(now);
        let fired = due.len();
        for timer in due {
            match timer {
                ViewTimer::DismissToast { toast_id } => {
                    if self.toast.as_ref().is_some_and(|t| t.id == toast_id) {
                        self.toast = None;
                        self.toast_timer = None;
                        self.events.emit(CartEvent::ToastDismissed);
                    }
                }
                ViewTimer::CloseCheckout { generation } => {
                    if self.dialog.finish(generation) {
                        self.phase_changed();
                    }
                }
            }
        }
        fired
    }

    /// Tear the view down. Pending timers are dropped and every later call
    /// is ignored.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        debug!(pending = self.timers.len(), "unmounting cart view");
        self.mounted = false;
        self.timers.cancel_all();
        self.toast_timer = None;
    }

    fn show_toast(&mut self, toast: Toast, lifetime: Duration, now: Instant) {
        if let Some(previous) = self.toast_timer.take() {
            self.timers.cancel(previous);
        }
        self.events.emit(CartEvent::ToastShown {
            kind: toast.kind,
            message: toast.message.clone(),
        });
        let timer = self.timers.schedule(
            now,
            lifetime,
            ViewTimer::DismissToast { toast_id: toast.id },
        );
        self.toast_timer = Some(timer);
        self.toast = Some(toast);
    }

    fn phase_changed(&self) {
        let phase = self.dialog.phase();
        debug!(phase = %phase, "checkout phase changed");
        self.events.emit(CartEvent::CheckoutPhaseChanged { phase });
    }
}
