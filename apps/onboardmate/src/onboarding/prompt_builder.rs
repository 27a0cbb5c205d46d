//! Prompt Builder: fills `{slot}` placeholders in a template from an `EmployeeProfile`.
//!
//! Substitution is a single left-to-right pass: inserted field text is never re-scanned,
//! so user input containing `{role}` reaches the model verbatim. No escaping is applied.

use thiserror::Error;

use crate::models::profile::{EmployeeProfile, PROFILE_FIELDS};
use crate::onboarding::prompts::ONBOARDING_PLAN_TEMPLATE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    /// The template names a slot the profile does not have. A configuration bug.
    #[error("template slot '{0}' has no matching profile field")]
    MissingField(String),
}

/// Builds the onboarding plan prompt for a profile.
pub fn build_onboarding_prompt(profile: &EmployeeProfile) -> Result<String, PromptError> {
    build_prompt(ONBOARDING_PLAN_TEMPLATE, profile)
}

/// Substitutes every `{slot}` in `template` with the profile field of the same name.
///
/// Braces that do not enclose a slot identifier are copied through unchanged.
pub fn build_prompt(template: &str, profile: &EmployeeProfile) -> Result<String, PromptError> {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find('}') {
            Some(close) if is_slot_name(&after[..close]) => {
                let slot = &after[..close];
                let value = profile
                    .field(slot)
                    .ok_or_else(|| PromptError::MissingField(slot.to_string()))?;
                out.push_str(value);
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

/// Fails if `template` references a slot that is not a profile field.
pub fn check_template(template: &str) -> Result<(), PromptError> {
    match template_slots(template)
        .into_iter()
        .find(|slot| !PROFILE_FIELDS.contains(slot))
    {
        Some(slot) => Err(PromptError::MissingField(slot.to_string())),
        None => Ok(()),
    }
}

/// Lists the slot names referenced by a template, in order of appearance.
pub fn template_slots(template: &str) -> Vec<&str> {
    let mut slots = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_slot_name(&after[..close]) => {
                slots.push(&after[..close]);
                rest = &after[close + 1..];
            }
            _ => rest = after,
        }
    }
    slots
}

fn is_slot_name(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
