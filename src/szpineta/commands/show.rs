use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::DocumentStore;

use super::helpers::load_poem;

pub fn run<S: DocumentStore>(store: &S, number: u64) -> Result<CmdResult> {
    let (_, poem) = load_poem(store, number)?;
    Ok(CmdResult::default().with_poem(poem))
}
