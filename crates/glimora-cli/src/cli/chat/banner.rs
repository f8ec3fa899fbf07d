//! Welcome banner display for the chat REPL.

use console::style;

/// Print the welcome banner at chat startup.
///
/// Shows the app name, the configured model, how many saved sessions
/// exist, and a hint about slash commands.
pub fn print_welcome_banner(model: &str, session_count: usize) {
    println!();
    println!("  {}", style("Glimora").cyan().bold());
    println!("  {}", style("Movie and drama chat, in your terminal").dim());
    println!();
    println!("  {}  {}", style("Model:").bold(), style(model).dim());
    if session_count > 0 {
        println!(
            "  {}  {}",
            style("Saved:").bold(),
            style(format!(
                "{session_count} session{}",
                if session_count == 1 { "" } else { "s" }
            ))
            .dim()
        );
    }
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
