//! Rule-based symptom triage
//!
//! Static tables only: red-flag phrases that call for emergency care, a few
//! common-cause guesses per symptom family, and generic self-care advice.
//! Educational output, not a diagnosis.

use serde::Serialize;

const RED_FLAGS: &[&str] = &[
    "severe chest pain",
    "difficulty breathing",
    "blue lips",
    "fainting",
    "confusion",
    "seizure",
    "pregnant bleeding",
    "stroke",
    "numbness one side",
];

const BASIC_ADVICE: &[&str] = &[
    "Stay hydrated and rest.",
    "Consider over-the-counter pain relievers per label instructions.",
    "Monitor symptoms and avoid known triggers.",
];

const MAX_CAUSES: usize = 5;

const DISCLAIMER: &str =
    "⚠️ Educational information only. Not a medical diagnosis. Consult a healthcare professional.";

/// How likely a cause is given the matched keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Likelihood {
    High,
    Medium,
    Low,
    Unknown,
}

impl Likelihood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unknown => "unknown",
        }
    }
}

/// A possible cause of the described symptoms
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cause {
    pub name: &'static str,
    pub likelihood: Likelihood,
}

impl Cause {
    const fn new(name: &'static str, likelihood: Likelihood) -> Self {
        Self { name, likelihood }
    }
}

/// Reference material shown with every report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub name: &'static str,
    pub url: &'static str,
}

const SOURCES: &[Source] = &[
    Source {
        name: "Isala hospital (General Health Info)",
        url: "https://www.isala.com/",
    },
    Source {
        name: "NHS Conditions",
        url: "https://www.nhs.uk/conditions/",
    },
    Source {
        name: "WHO Health Topics",
        url: "https://www.who.int/health-topics",
    },
];

/// Triage result
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Red-flag phrases found in the text
    pub red_flags: Vec<&'static str>,
    /// Possible causes, most likely first within each symptom family
    pub causes: Vec<Cause>,
    /// Human-readable summary of flags, causes and advice
    pub message: String,
    pub sources: Vec<Source>,
    pub disclaimer: &'static str,
}

/// Red-flag phrases contained in the text
pub fn detect_red_flags(text: &str) -> Vec<&'static str> {
    let t = text.to_lowercase();
    RED_FLAGS.iter().copied().filter(|rf| t.contains(rf)).collect()
}

/// Common causes for the symptom families mentioned in the text
pub fn guess_common_causes(text: &str) -> Vec<Cause> {
    let t = text.to_lowercase();
    let mut causes = Vec::new();

    if ["sore throat", "leg", "fever", "cough"].iter().any(|k| t.contains(k)) {
        causes.push(Cause::new("Viral upper respiratory infection (cold/flu)", Likelihood::High));
        causes.push(Cause::new("Strep throat", Likelihood::Medium));
        causes.push(Cause::new("Allergy-related irritation", Likelihood::Low));
    }
    if t.contains("headache") || t.contains("migraine") {
        causes.push(Cause::new("Tension headache", Likelihood::High));
        causes.push(Cause::new("Migraine", Likelihood::Medium));
        causes.push(Cause::new("Dehydration", Likelihood::Low));
    }
    if t.contains("chest pain") {
        causes.push(Cause::new("Musculoskeletal strain", Likelihood::Medium));
        causes.push(Cause::new("Cardiac cause", Likelihood::Unknown));
    }

    if causes.is_empty() {
        causes.push(Cause::new("General, non-specific symptoms", Likelihood::Unknown));
    }
    causes
}

/// Symptom triage from static rules
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthAdvisor;

impl HealthAdvisor {
    pub fn new() -> Self {
        Self
    }

    /// Triage a free-text symptom description
    pub fn handle(&self, symptoms: &str) -> HealthReport {
        let red_flags = detect_red_flags(symptoms);
        let causes = guess_common_causes(symptoms);

        let mut lines = Vec::new();
        if !red_flags.is_empty() {
            lines.push(format!("🚨 Red flags detected: {}", red_flags.join("; ")));
            lines.push(
                "If you are experiencing any of the above, seek emergency care immediately."
                    .to_string(),
            );
        }

        lines.push("Possible causes (not a diagnosis):".to_string());
        for cause in causes.iter().take(MAX_CAUSES) {
            lines.push(format!(" - {} (likelihood: {})", cause.name, cause.likelihood.as_str()));
        }

        lines.push("\nSelf-care suggestions:".to_string());
        for advice in BASIC_ADVICE {
            lines.push(format!(" - {}", advice));
        }

        HealthReport {
            red_flags,
            causes,
            message: lines.join("\n"),
            sources: SOURCES.to_vec(),
            disclaimer: DISCLAIMER,
        }
    }
}
