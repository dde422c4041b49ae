use crate::common::read_input;
use crate::errors::MenuCartError;
use crate::logger;
use clap::Parser;
use menucart_markup::common_list_item_classes;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct ClassesCommand {
    /// Menu markup to inspect. If not provided, reads from stdin
    pub file: Option<PathBuf>,
}

/// Print the classes every top-level menu item shares.
pub fn handle_classes(cmd: ClassesCommand) -> Result<(), MenuCartError> {
    let markup = read_input(cmd.file.as_deref())?;
    let classes = common_list_item_classes(&markup);
    if classes.is_empty() {
        logger::info("No class is shared by all menu items");
    }
    println!("{}", classes);
    Ok(())
}
