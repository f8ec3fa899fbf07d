//! Interactive chat REPL: input handling, slash commands, rendering, and
//! the turn loop.

mod banner;
mod commands;
mod input;
mod loop_runner;
mod renderer;

pub use loop_runner::run_chat_loop;
