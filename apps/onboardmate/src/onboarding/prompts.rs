// All LLM prompt constants for the onboarding module.

/// Onboarding plan template.
/// Slots: {name}, {role}, {department}, {start_date}, {previous_experience}, {goals}
pub const ONBOARDING_PLAN_TEMPLATE: &str = r#"Create a personalized onboarding plan for a new hire with the following details:

*   **Name:** {name}
*   **Role:** {role}
*   **Department:** {department}
*   **Start Date:** {start_date}
*   **Previous Experience:** {previous_experience}
*   **Onboarding Goals:** {goals}

The plan should include:
- A checklist of tasks to be completed
- A schedule of onboarding sessions
- Links to relevant training materials
- Key contacts and resources

Write the onboarding plan in a clear and concise format."#;

/// Prepended to every knowledge-assistance query. The raw query follows verbatim.
pub const KNOWLEDGE_ASSISTANCE_PREFIX: &str =
    "Provide a detailed response to the following query from a new hire:\n\n";
