use colored::Colorize;
use szpineta::commands::{CmdMessage, MessageLevel};
use szpineta::model::{AddedPoem, PoemText};

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub(super) fn print_added(added: &AddedPoem) {
    let title = added.title.as_deref().unwrap_or("(untitled)");
    println!(
        "{} {}",
        format!("#{}", added.listing_index + 1).yellow(),
        title.bold()
    );
    println!(
        "{}",
        format!(
            "data-index {} (listing), {} (summary)",
            added.listing_index, added.summary_index
        )
        .dimmed()
    );
}

pub(super) fn print_poem(poem: &PoemText) {
    println!("{}", poem.text());
}
