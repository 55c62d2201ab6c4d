#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("failed to spawn `{command}`")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("`{command}` failed ({})\n{stderr}", describe_exit(*code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("output of `{command}` was not valid UTF-8")]
    InvalidUtf8 {
        command: String,
        source: std::string::FromUtf8Error,
    },
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_owned(),
    }
}
