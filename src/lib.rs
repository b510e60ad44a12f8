//! Toolgate: an interactive runner for tool-calling agents whose tool calls
//! can pause for out-of-band authorization or an operator's approval.
//!
//! A turn alternates execution cycles and suspension rounds until the agent
//! finishes without suspending:
//!
//! ```no_run
//! use std::sync::Arc;
//! use toolgate::collector::DecisionCollector;
//! use toolgate::driver::TurnDriver;
//! use toolgate::session::Session;
//! # use toolgate::agent::AgentExecutor;
//! # use toolgate::catalog::AuthorizationService;
//! # use toolgate::frontend::Frontend;
//! # use toolgate::ui::render::RenderSink;
//!
//! # async fn example(
//! #     agent: Arc<dyn AgentExecutor>,
//! #     auth: Arc<dyn AuthorizationService>,
//! #     frontend: Arc<dyn Frontend>,
//! #     renderer: Arc<dyn RenderSink>,
//! # ) {
//! let collector = DecisionCollector::new(auth, frontend, renderer.clone());
//! let driver = TurnDriver::new(agent, Arc::new(collector), renderer);
//! let mut session = Session::new("1");
//! let report = driver.run_turn(&mut session, "find wireless headphones").await.unwrap();
//! println!("{} cycle(s)", report.cycles);
//! # }
//! ```

pub mod agent;
pub mod api;
pub mod build_info;
pub mod catalog;
pub mod collector;
pub mod config;
pub mod decision;
pub mod driver;
pub mod error;
pub mod frontend;
pub mod session;
pub mod suspension;
#[cfg(test)]
pub mod testsupport;
pub mod types;
pub mod ui;
