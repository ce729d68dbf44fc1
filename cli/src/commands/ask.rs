use labelist_core::{CoercedValue, Flags, Result, ShellError};
use labelist_sqlite::Converse;

use crate::context::AppContext;
use crate::inference::GenerateOptions;

/// `ask [--model M] [--temperature T] (--prompt P | <words...>)`.
///
/// Generates an answer, embeds both sides and stores the pair in the
/// current table.
pub(super) fn run(ctx: &mut AppContext, flags: &Flags) -> Result<()> {
    if flags.wants_help() {
        return ctx.show_help("ask");
    }
    let prompt = prompt_text(flags)?;
    let model = match flags.optional_literal("model")? {
        Some(model) => model.to_string(),
        None => ctx.ollama.model.clone(),
    };
    let mut options = GenerateOptions::from(&ctx.ollama);
    if let Some(value) = flags.optional_single("temperature", "float")? {
        options.temperature = temperature(value)?;
    }
    let table = ctx.existing_table()?;

    ctx.console.info(&format!("Asking {model}..."));
    let answer = ctx.inference.generate(&model, &prompt, &options)?;
    ctx.console.field("ANSWER", &answer);

    let veci = ctx.embedder.embed(&prompt)?;
    let veco = ctx.embedder.embed(&answer)?;
    let id = ctx
        .converse
        .insert(&table, &Converse::new(prompt, answer, veci, veco))?;
    ctx.console
        .done(&format!("Stored conversation {id} in {table}."));
    Ok(())
}

fn prompt_text(flags: &Flags) -> Result<String> {
    let words = flags.root_literals();
    match (flags.contains("prompt"), words.is_empty()) {
        (true, false) => Err(ShellError::ExcessiveArgs(format!(
            "ask accepts either --prompt or unflagged words, got both ({} words)",
            words.len()
        ))),
        (true, true) => Ok(flags.single_literal("ask", "prompt")?.to_string()),
        (false, false) => Ok(words.join(" ")),
        (false, true) => Err(ShellError::MissingFlag(
            "ask command requires flag --prompt.".to_string(),
        )),
    }
}

fn temperature(value: &CoercedValue) -> Result<f64> {
    let t = value.as_float().ok_or_else(|| {
        ShellError::ArgumentValue(format!(
            "--temperature required arg of type float, got {} ({value})",
            value.type_name()
        ))
    })?;
    if !(0.0..=1.0).contains(&t) {
        return Err(ShellError::ArgumentValue(format!(
            "--temperature must be between 0 and 1, got {t}"
        )));
    }
    Ok(t)
}
