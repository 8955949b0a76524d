use console::{Emoji, style};

pub static INFO_ICON: Emoji<'_, '_> = Emoji("ℹ️  ", "");
pub static ERROR_ICON: Emoji<'_, '_> = Emoji("❌ ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

pub fn print_info(msg: &str) {
    println!("{} {}", INFO_ICON, style(msg).blue());
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", ERROR_ICON, style(msg).red().bold());
}

pub fn print_status(label: &str, msg: &str) {
    println!("  {} {}: {}", GEAR, style(label).bold().cyan(), msg);
}

/// Prints a bot reply as-is; replies already carry their own icon.
pub fn print_reply(reply: &str) {
    println!("{}", reply);
}

pub fn print_command(name: &str, about: &str) {
    println!("  {:<10} {}", style(name).green().bold(), style(about).dim());
}

pub fn print_goodbye() {
    println!("\n{} {}", SPARKLE, style("pcmanager stopped. Bye!").bold().cyan());
}
