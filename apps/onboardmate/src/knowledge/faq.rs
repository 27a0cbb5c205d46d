use serde::Serialize;

/// Suggested questions shown above the query box.
pub const EXAMPLE_QUESTIONS: &[&str] = &[
    "Where can I find the project documentation?",
    "What is the process for requesting time off?",
    "How do I set up my email account?",
    "Where can I find the employee handbook?",
    "What are the core working hours?",
    "How do I access the company's intranet?",
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

const fn entry(question: &'static str, answer: &'static str) -> FaqEntry {
    FaqEntry { question, answer }
}

pub const GENERAL_FAQS: &[FaqEntry] = &[
    entry(
        "How do I set up my email account?",
        "You can set up your email account by following the instructions provided in the onboarding email. If you need further assistance, contact IT support.",
    ),
    entry(
        "What is the process for requesting time off?",
        "You can request time off by submitting a request through the HR portal. Make sure to get approval from your manager.",
    ),
    entry(
        "Where can I find the employee handbook?",
        "The employee handbook is available on the company's intranet under the 'Resources' section.",
    ),
    entry(
        "What are the core working hours?",
        "The core working hours are from 9 AM to 5 PM, Monday to Friday.",
    ),
    entry(
        "How do I access the company's intranet?",
        "You can access the intranet by logging in with your company credentials at intranet.company.com.",
    ),
    entry(
        "What is the dress code policy?",
        "The company follows a business casual dress code. Please refer to the employee handbook for more details.",
    ),
    entry(
        "How do I request IT support?",
        "You can request IT support by submitting a ticket through the IT support portal or by calling the IT helpdesk.",
    ),
    entry(
        "What are the key contacts in my department?",
        "You can find the key contacts in your department by checking the department directory on the intranet.",
    ),
    entry(
        "How do I enroll in benefits?",
        "You can enroll in benefits by logging into the HR portal and following the enrollment instructions.",
    ),
    entry(
        "What is the process for submitting expenses?",
        "You can submit expenses by filling out the expense report form available on the HR portal and submitting it for approval.",
    ),
    entry(
        "How do I access training materials?",
        "Training materials are available on the company's learning management system (LMS). You can access it through the intranet.",
    ),
    entry(
        "What is the company's policy on remote work?",
        "The company allows remote work for certain roles. Please check with your manager and refer to the remote work policy in the employee handbook.",
    ),
    entry(
        "How do I schedule a meeting room?",
        "You can schedule a meeting room by using the room booking system available on the intranet.",
    ),
    entry(
        "What are the company's core values?",
        "The company's core values are integrity, innovation, collaboration, and excellence.",
    ),
    entry(
        "How do I report a technical issue?",
        "You can report a technical issue by submitting a ticket through the IT support portal or by contacting the IT helpdesk.",
    ),
    entry(
        "What is the process for performance reviews?",
        "Performance reviews are conducted bi-annually. You will receive a notification from HR with instructions on how to prepare.",
    ),
    entry(
        "How do I update my personal information in the system?",
        "You can update your personal information by logging into the HR portal and navigating to the 'My Profile' section.",
    ),
    entry(
        "What are the company's social media guidelines?",
        "The company's social media guidelines are available in the employee handbook. Please review them before posting on social media.",
    ),
    entry(
        "How do I request business cards?",
        "You can request business cards by submitting a request through the HR portal. Make sure to include your design preferences.",
    ),
];
