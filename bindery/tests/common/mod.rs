#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use bindery::validation::{Rules, ValidationConfig, ValidationEngine};
use simplelog::{Config, LevelFilter, TestLogger};

static LOGGER: Once = Once::new();

pub fn init_logging() {
    LOGGER.call_once(|| {
        let _ = TestLogger::init(LevelFilter::Trace, Config::default());
    });
}

pub const ERROR_MESSAGE_1: &str = "Error 1 !!!";
pub const ERROR_MESSAGE_2: &str = "Error 2 !!!";
pub const PATTERN_ERROR: &str = "Regular expression error";
pub const TEN_ERROR: &str = "The field IntegerBetweenZeroAndTen must be between 0 and 10.";
pub const FIFTY_ERROR: &str = "The field IntegerBetweenZeroAndFifty must be between 0 and 50.";
pub const AMOUNT_PATTERN: &str = r"^\$?\d+(\.(\d{2}))?$";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    pub test_property1: String,
    pub test_property2: String,
    pub between_zero_and_ten: i32,
    pub between_zero_and_fifty: i32,
}

pub fn sample_rules() -> Arc<Rules<Sample>> {
    let rules = Rules::<Sample>::builder()
        .property("TestProperty1", |s: &Sample| s.test_property1.clone())
        .min_length(2, ERROR_MESSAGE_1)
        .pattern(AMOUNT_PATTERN, PATTERN_ERROR)
        .property("TestProperty2", |s: &Sample| s.test_property2.clone())
        .min_length(2, ERROR_MESSAGE_2)
        .pattern(AMOUNT_PATTERN, PATTERN_ERROR)
        .property("IntegerBetweenZeroAndTen", |s: &Sample| s.between_zero_and_ten)
        .range(0, 10, TEN_ERROR)
        .property("IntegerBetweenZeroAndFifty", |s: &Sample| s.between_zero_and_fifty)
        .range(0, 50, FIFTY_ERROR)
        .build()
        .expect("sample rules are valid");
    Arc::new(rules)
}

/// View-model wrapping [`Sample`] the way application code would.
pub struct SampleViewModel {
    pub model: Sample,
    pub validation: ValidationEngine<Sample>,
}

impl SampleViewModel {
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            model: Sample::default(),
            validation: ValidationEngine::with_config(sample_rules(), config),
        }
    }

    pub fn set_between_zero_and_ten(&mut self, value: i32) -> bool {
        self.validation
            .set_property(&mut self.model, "IntegerBetweenZeroAndTen", value, |m| {
                &mut m.between_zero_and_ten
            })
            .expect("property name is not empty")
    }

    pub fn set_between_zero_and_fifty(&mut self, value: i32) -> bool {
        self.validation
            .set_property(&mut self.model, "IntegerBetweenZeroAndFifty", value, |m| {
                &mut m.between_zero_and_fifty
            })
            .expect("property name is not empty")
    }
}

/// Shared, ordered record of events seen by test observers.
#[derive(Clone, Default)]
pub struct EventLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.entries().iter().filter(|e| *e == entry).count()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}
