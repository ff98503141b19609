//! The three metamorphoses
//!
//! Exactly one form is active at a time. Cycling walks
//! Camel -> Lion -> Child -> Camel (or the reverse).

use serde::{Deserialize, Serialize};

use crate::tuning::{FormTuning, form_tuning};

/// Player form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Form {
    /// Slow and heavy; halves incoming damage, ground-shaking tremor attack
    #[default]
    Camel,
    /// Fast; lunging claw swipe
    Lion,
    /// Small and light; throws stars
    Child,
}

impl Form {
    pub const ALL: [Form; 3] = [Form::Camel, Form::Lion, Form::Child];

    pub fn next(self) -> Self {
        match self {
            Form::Camel => Form::Lion,
            Form::Lion => Form::Child,
            Form::Child => Form::Camel,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Form::Camel => Form::Child,
            Form::Lion => Form::Camel,
            Form::Child => Form::Lion,
        }
    }

    /// Upper-case identifier used in sound event names
    pub fn as_str(&self) -> &'static str {
        match self {
            Form::Camel => "CAMEL",
            Form::Lion => "LION",
            Form::Child => "CHILD",
        }
    }

    /// Movement/combat parameters for this form
    #[inline]
    pub fn tuning(&self) -> &'static FormTuning {
        form_tuning(*self)
    }
}
