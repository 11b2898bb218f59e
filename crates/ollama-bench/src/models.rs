//! Model discovery via `ollama ls`

use crate::command::CommandRunner;

/// First column of every non-blank line after the header.
pub fn parse_model_list(output: &str) -> Vec<String> {
    output
        .trim()
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Ask ollama which models are installed.
///
/// Never fails: a missing binary or a failing command is logged and yields
/// an empty list, which the caller reports as "no models found".
pub fn list_models(runner: &dyn CommandRunner, ollama: &str) -> Vec<String> {
    let output = match runner
        .run(ollama, &["ls"], None)
        .and_then(|out| out.into_success(ollama))
    {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!("Could not list models: {e}");
            return Vec::new();
        }
    };

    let models = parse_model_list(&output.stdout);
    tracing::debug!("Discovered {} model(s)", models.len());
    models
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::fake::{FakeRunner, Reply};
    use crate::command::CommandOutput;

    const LS_OUTPUT: &str = "\
NAME                ID              SIZE      MODIFIED
mistral:7b          6577803aa9a0    4.4 GB    2 days ago
gpt-oss:20b         17052f91a42e    13 GB     3 weeks ago

llama3.2:latest     a80c4f17acd5    2.0 GB    5 weeks ago
";

    #[test]
    fn test_parse_model_list() {
        assert_eq!(
            parse_model_list(LS_OUTPUT),
            vec!["mistral:7b", "gpt-oss:20b", "llama3.2:latest"]
        );
    }

    #[test]
    fn test_parse_header_only() {
        assert!(parse_model_list("NAME    ID    SIZE    MODIFIED\n").is_empty());
        assert!(parse_model_list("").is_empty());
    }

    #[test]
    fn test_list_models_uses_runner() {
        let runner = FakeRunner::new().with_output("ollama ls", LS_OUTPUT);
        assert_eq!(list_models(&runner, "ollama").len(), 3);
    }

    #[test]
    fn test_list_models_missing_binary() {
        let runner = FakeRunner::new();
        assert!(list_models(&runner, "ollama").is_empty());
    }

    #[test]
    fn test_list_models_failing_command() {
        let runner = FakeRunner::new().with(
            "ollama ls",
            Reply::Output(CommandOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: "could not connect to ollama app".to_string(),
            }),
        );
        assert!(list_models(&runner, "ollama").is_empty());
    }
}
