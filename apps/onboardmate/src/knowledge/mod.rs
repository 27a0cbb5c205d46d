// Knowledge assistance view: free-text questions plus a static FAQ.
// Questions go through OnboardingAgent; the FAQ never touches the backend.

pub mod faq;
pub mod handlers;
