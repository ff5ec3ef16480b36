//! Host slash command language.
//!
//! Users can drive registered components with commands such as `/jenga pull`.
//! A [`SlashCommand`] declares one named command with a single positional argument
//! restricted to an enumerated set of values, and an async callback invoked with
//! the argument when a user runs it.

use std::{collections::HashMap, future::Future};

use command_parser::Parser;
use futures::future::{FutureExt, LocalBoxFuture};
use log::{debug, info};

type Callback = Box<dyn Fn(Option<String>) -> LocalBoxFuture<'static, ()>>;

/// One allowed value of a slash command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Value typed by the user
    pub value: String,
    /// Short description shown in the usage
    pub description: String,
}

impl EnumValue {
    pub fn new(value: &str, description: &str) -> Self {
        EnumValue {
            value: value.to_owned(),
            description: description.to_owned(),
        }
    }
}

/// A named host command with one enumerated positional argument.
pub struct SlashCommand {
    /// Command name, typed after the prefix
    name: String,
    /// One line description of the command
    help: String,
    /// Values advertised for the positional argument
    values: Vec<EnumValue>,
    /// Invoked with the positional argument, if any
    callback: Callback,
}

impl SlashCommand {
    /// Declares a command.
    ///
    /// The callback receives the raw positional argument. Validation against
    /// `values` is up to the callback: the values are advertised, not enforced.
    pub fn new<F, Fut>(name: &str, help: &str, values: Vec<EnumValue>, callback: F) -> Self
    where
        F: Fn(Option<String>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        SlashCommand {
            name: name.to_owned(),
            help: help.to_owned(),
            values,
            callback: Box::new(move |argument| callback(argument).boxed_local()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }
}

/// Errors returned by [`SlashCommandRegistry::execute`].
#[derive(Debug, PartialEq, Eq)]
pub enum SlashCommandError {
    /// The text is not a slash command at all
    NotACommand,
    /// The text is a slash command nobody registered
    Unknown(String),
}

/// Registered slash commands and their parser.
pub struct SlashCommandRegistry {
    /// Command prefix, `/` by default
    prefix: char,
    /// Parser configured with the prefix
    parser: Parser,
    /// Registered commands indexed by name
    commands: HashMap<String, SlashCommand>,
}

impl SlashCommandRegistry {
    /// Creates an empty registry for commands starting with `prefix`.
    pub fn new(prefix: char) -> Self {
        SlashCommandRegistry {
            prefix,
            parser: Parser::new(prefix, '-'),
            commands: HashMap::new(),
        }
    }

    /// Registers a command, replacing any command with the same name.
    pub fn register(&mut self, command: SlashCommand) {
        info!("registered {}", self.format_usage(&command));
        self.commands.insert(command.name().to_owned(), command);
    }

    /// Returns the usage line of a registered command, e.g. `/jenga <start|pull>`.
    pub fn usage(&self, name: &str) -> Option<String> {
        self.commands
            .get(name)
            .map(|command| self.format_usage(command))
    }

    /// Returns `true` if `text` invokes a registered command.
    pub fn is_command(&self, text: &str) -> bool {
        self.parse(text)
            .map(|(name, _)| self.commands.contains_key(&name))
            .unwrap_or(false)
    }

    /// Runs the command invoked by `text`.
    ///
    /// # Errors
    ///
    /// - [`SlashCommandError::NotACommand`] if `text` does not start with the prefix
    /// - [`SlashCommandError::Unknown`] if no command with that name is registered
    pub async fn execute(&self, text: &str) -> Result<(), SlashCommandError> {
        let (name, argument) = self.parse(text).ok_or(SlashCommandError::NotACommand)?;

        let Some(command) = self.commands.get(&name) else {
            return Err(SlashCommandError::Unknown(name));
        };

        debug!("executing /{} with argument {:?}", name, argument);
        (command.callback)(argument).await;

        Ok(())
    }

    fn parse(&self, text: &str) -> Option<(String, Option<String>)> {
        // The parser drops the last word of the input, so pad it with a throwaway one
        let body = text.trim().to_string() + " dummy";

        let command = self.parser.parse(&body).ok()?;
        Some((command.name.clone(), command.arguments.first().cloned()))
    }

    fn format_usage(&self, command: &SlashCommand) -> String {
        let values = command
            .values()
            .iter()
            .map(|value| value.value.as_str())
            .collect::<Vec<_>>()
            .join("|");

        format!(
            "{}{} <{}> - {}",
            self.prefix,
            command.name(),
            values,
            command.help
        )
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn create_registry(seen: &Rc<RefCell<Vec<Option<String>>>>) -> SlashCommandRegistry {
        let mut registry = SlashCommandRegistry::new('/');
        let seen = Rc::clone(seen);
        registry.register(SlashCommand::new(
            "jenga",
            "Play Jenga",
            vec![EnumValue::new("start", "Start a game"), EnumValue::new("pull", "Pull a block")],
            move |argument| {
                let seen = Rc::clone(&seen);
                async move { seen.borrow_mut().push(argument) }
            },
        ));
        registry
    }

    #[tokio::test]
    async fn test_execute_passes_argument() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let registry = create_registry(&seen);

        let result = registry.execute("/jenga pull").await;

        assert_eq!(result, Ok(()));
        assert_eq!(*seen.borrow(), vec![Some("pull".to_string())]);
    }

    #[tokio::test]
    async fn test_execute_without_argument() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let registry = create_registry(&seen);

        let result = registry.execute("/jenga").await;

        assert_eq!(result, Ok(()));
        assert_eq!(*seen.borrow(), vec![None]);
    }

    #[tokio::test]
    async fn test_execute_unknown_command() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let registry = create_registry(&seen);

        let result = registry.execute("/chess start").await;

        assert_eq!(result, Err(SlashCommandError::Unknown("chess".to_string())));
        assert!(seen.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_execute_plain_text() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let registry = create_registry(&seen);

        let result = registry.execute("let's play jenga").await;

        assert_eq!(result, Err(SlashCommandError::NotACommand));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_is_command() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let registry = create_registry(&seen);

        assert!(registry.is_command("/jenga start"));
        assert!(!registry.is_command("/chess start"));
        assert!(!registry.is_command("!startjenga"));
    }

    #[test]
    fn test_usage() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let registry = create_registry(&seen);

        assert_eq!(
            registry.usage("jenga"),
            Some("/jenga <start|pull> - Play Jenga".to_string())
        );
        assert_eq!(registry.usage("chess"), None);
    }
}
