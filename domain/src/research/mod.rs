//! Research subdomain: the plan, its steps, and what each step found.
//!
//! - [`entities`]: [`ResearchStep`](entities::ResearchStep), [`Finding`](entities::Finding), [`Citation`](entities::Citation)
//! - [`plan_parser`]: turns a planner response into step questions
//! - [`findings_parser`]: turns a researcher response into findings

pub mod entities;
pub mod findings_parser;
pub mod plan_parser;
