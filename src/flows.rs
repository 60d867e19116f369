//! Simulated payment and payout round-trips.
//!
//! Both overlays run the same two-phase flow: a processing delay, then a
//! receipt shown for a fixed time. Nothing here can fail once the form is
//! valid; the caller commits to the session or ledger when the flow says so.

use crate::constants::{
    PAYMENT_PROCESSING, PAYMENT_RECEIPT, WITHDRAW_PROCESSING, WITHDRAW_RECEIPT,
};
use crate::error::{Result, TimorError};
use crate::scheduler::{Scheduler, TimerId};
use crate::wallet::validate_withdrawal;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FlowPhase {
    #[default]
    Form,
    Processing,
    Success,
}

/// Emitted when a phase ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowEvent {
    /// Processing finished; the receipt is now shown.
    Processed,
    /// Receipt finished, either by timeout or by the user closing it.
    Finished,
}

/// Form → Processing → Success → Form, driven by virtual time.
#[derive(Debug)]
pub struct TimedFlow {
    phase: FlowPhase,
    processing: Duration,
    receipt: Duration,
    timers: Scheduler<FlowPhase>,
    pending: Option<TimerId>,
}

impl TimedFlow {
    pub fn new(processing: Duration, receipt: Duration) -> Self {
        Self {
            phase: FlowPhase::Form,
            processing,
            receipt,
            timers: Scheduler::new(),
            pending: None,
        }
    }

    /// 2 s gateway call, then a 5 s receipt. The upgrade lands when the receipt ends.
    pub fn payment() -> Self {
        Self::new(PAYMENT_PROCESSING, PAYMENT_RECEIPT)
    }

    /// 1.5 s payout call, then a 2 s confirmation. The debit lands when processing ends.
    pub fn withdrawal() -> Self {
        Self::new(WITHDRAW_PROCESSING, WITHDRAW_RECEIPT)
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    /// Starts processing. Ignored unless the form is showing.
    pub fn submit(&mut self) -> bool {
        if self.phase != FlowPhase::Form {
            return false;
        }
        self.enter(FlowPhase::Processing, Some(self.processing));
        true
    }

    /// User dismissed the overlay.
    ///
    /// Closing mid-processing abandons the call. Closing the receipt finishes
    /// the flow early, so the caller still gets its [`FlowEvent::Finished`].
    pub fn close(&mut self) -> Option<FlowEvent> {
        let event = match self.phase {
            FlowPhase::Success => Some(FlowEvent::Finished),
            FlowPhase::Form | FlowPhase::Processing => None,
        };
        self.enter(FlowPhase::Form, None);
        event
    }

    pub fn advance(&mut self, elapsed: Duration) -> Vec<FlowEvent> {
        let until = self.timers.now() + elapsed;
        let mut events = Vec::new();
        while let Some(from) = self.timers.pop_due(until) {
            self.pending = None;
            match from {
                FlowPhase::Processing => {
                    self.enter(FlowPhase::Success, Some(self.receipt));
                    events.push(FlowEvent::Processed);
                }
                FlowPhase::Success => {
                    self.enter(FlowPhase::Form, None);
                    events.push(FlowEvent::Finished);
                }
                FlowPhase::Form => {}
            }
        }
        self.timers.settle(until);
        events
    }

    fn enter(&mut self, phase: FlowPhase, timeout: Option<Duration>) {
        if let Some(id) = self.pending.take() {
            self.timers.cancel(id);
        }
        self.phase = phase;
        if let Some(delay) = timeout {
            self.pending = Some(self.timers.schedule(delay, phase));
        }
    }
}

/// Payment rails offered on the upgrade overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Visa,
    Card,
    Mobile,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Visa, PaymentMethod::Card, PaymentMethod::Mobile];

    /// Name printed on the receipt.
    pub fn receipt_label(self) -> &'static str {
        match self {
            PaymentMethod::Visa => "Visa Direct",
            PaymentMethod::Card => "Credit Card",
            PaymentMethod::Mobile => "E-Wallet",
        }
    }

    pub fn next(self) -> Self {
        match self {
            PaymentMethod::Visa => PaymentMethod::Card,
            PaymentMethod::Card => PaymentMethod::Mobile,
            PaymentMethod::Mobile => PaymentMethod::Visa,
        }
    }
}

/// Mobile wallet operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MobileProvider {
    #[default]
    Telemor,
    TimorTelecom,
    Telkomcel,
}

impl MobileProvider {
    pub fn label(self) -> &'static str {
        match self {
            MobileProvider::Telemor => "Telemor (Mosan)",
            MobileProvider::TimorTelecom => "Timor Telecom (T-Pay)",
            MobileProvider::Telkomcel => "Telkomcel (T-Money)",
        }
    }

    pub fn next(self) -> Self {
        match self {
            MobileProvider::Telemor => MobileProvider::TimorTelecom,
            MobileProvider::TimorTelecom => MobileProvider::Telkomcel,
            MobileProvider::Telkomcel => MobileProvider::Telemor,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentField {
    CardNumber,
    Expiry,
    Cvc,
    Phone,
}

impl PaymentField {
    pub fn label(self) -> &'static str {
        match self {
            PaymentField::CardNumber => "Card number",
            PaymentField::Expiry => "Expiry (MM/YY)",
            PaymentField::Cvc => "CVC",
            PaymentField::Phone => "Phone number",
        }
    }
}

/// Fields of the upgrade overlay. Card details are never checked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymentForm {
    pub method: PaymentMethod,
    pub provider: MobileProvider,
    pub card_number: String,
    pub expiry: String,
    pub cvc: String,
    pub phone: String,
    focus: usize,
}

impl PaymentForm {
    /// Input fields shown for the selected method.
    pub fn fields(&self) -> &'static [PaymentField] {
        match self.method {
            PaymentMethod::Visa | PaymentMethod::Card => {
                &[PaymentField::CardNumber, PaymentField::Expiry, PaymentField::Cvc]
            }
            PaymentMethod::Mobile => &[PaymentField::Phone],
        }
    }

    pub fn focused(&self) -> PaymentField {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn value(&self, field: PaymentField) -> &str {
        match field {
            PaymentField::CardNumber => &self.card_number,
            PaymentField::Expiry => &self.expiry,
            PaymentField::Cvc => &self.cvc,
            PaymentField::Phone => &self.phone,
        }
    }

    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focused() {
            PaymentField::CardNumber => &mut self.card_number,
            PaymentField::Expiry => &mut self.expiry,
            PaymentField::Cvc => &mut self.cvc,
            PaymentField::Phone => &mut self.phone,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields().len();
    }

    pub fn cycle_method(&mut self) {
        self.method = self.method.next();
        self.focus = 0;
    }

    /// Every visible field must be filled in.
    pub fn validate(&self) -> Result<()> {
        match self.fields().iter().find(|f| self.value(**f).trim().is_empty()) {
            Some(field) => Err(TimorError::MissingField {
                field: field.label(),
            }),
            None => Ok(()),
        }
    }
}

/// Payout destinations. Recorded for display only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WithdrawMethod {
    #[default]
    Visa,
    Bank,
}

impl WithdrawMethod {
    pub fn label(self) -> &'static str {
        match self {
            WithdrawMethod::Visa => "Visa / Merchantrade",
            WithdrawMethod::Bank => "Bank Transfer",
        }
    }

    pub fn destination_label(self) -> &'static str {
        match self {
            WithdrawMethod::Visa => "Card number (Merchantrade/Visa)",
            WithdrawMethod::Bank => "Bank account number",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            WithdrawMethod::Visa => WithdrawMethod::Bank,
            WithdrawMethod::Bank => WithdrawMethod::Visa,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WithdrawField {
    #[default]
    Amount,
    Destination,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WithdrawForm {
    pub amount: String,
    pub destination: String,
    pub method: WithdrawMethod,
    pub focus: WithdrawField,
}

impl WithdrawForm {
    /// Parsed amount, `None` when the text is not a number.
    pub fn amount(&self) -> Option<f64> {
        self.amount.trim().parse().ok()
    }

    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            WithdrawField::Amount => &mut self.amount,
            WithdrawField::Destination => &mut self.destination,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            WithdrawField::Amount => WithdrawField::Destination,
            WithdrawField::Destination => WithdrawField::Amount,
        };
    }

    /// Checks the form against `balance` and returns the amount to pay out.
    pub fn validate(&self, balance: f64) -> Result<f64> {
        let amount = self.amount().unwrap_or(0.0);
        validate_withdrawal(amount, balance)?;
        if self.destination.trim().is_empty() {
            return Err(TimorError::MissingField {
                field: "destination",
            });
        }
        Ok(amount)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
