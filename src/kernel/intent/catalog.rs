use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub type IntentId = String;

/// Fixed farewell spoken by the shutdown intent.
pub const FAREWELL: &str = "Shutting down. Goodbye!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentKind {
    /// Plain reply, possibly computed (clock readings).
    Conversational,
    /// Launches an application. Single-word triggers are intended, so the
    /// matcher's length guard is waived.
    Launch,
    /// Terminates the session after the farewell.
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaunchTarget {
    Chrome,
    YouTube,
    ITunes,
}

impl LaunchTarget {
    /// Name used in the spoken report ("Opening Google Chrome").
    pub fn display_name(&self) -> &'static str {
        match self {
            LaunchTarget::Chrome => "Google Chrome",
            LaunchTarget::YouTube => "YouTube",
            LaunchTarget::ITunes => "iTunes",
        }
    }
}

/// Zero-argument producers. Pattern-matched by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `template` holds one `{}` replaced by the clock formatted with `format`.
    ClockReading {
        template: &'static str,
        format: &'static str,
    },
    Launch(LaunchTarget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Literal(String),
    Computed(Action),
}

impl Response {
    pub fn literal(text: impl Into<String>) -> Self {
        Response::Literal(text.into())
    }

    pub fn clock(template: &'static str, format: &'static str) -> Self {
        Response::Computed(Action::ClockReading { template, format })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Intent {
    id: IntentId,
    kind: IntentKind,
    triggers: Vec<String>,
    responses: Vec<Response>,
}

impl Intent {
    /// Triggers are lower-cased here. Fails on an empty trigger or response set.
    pub fn new<I, S>(
        id: &str,
        kind: IntentKind,
        triggers: I,
        responses: Vec<Response>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let triggers: Vec<String> = triggers
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        if triggers.is_empty() {
            return Err(Error::Catalog(format!("intent '{}' has no trigger phrases", id)));
        }
        if responses.is_empty() {
            return Err(Error::Catalog(format!("intent '{}' has no responses", id)));
        }

        Ok(Self {
            id: id.to_string(),
            kind,
            triggers,
            responses,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> IntentKind {
        self.kind
    }

    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }
}

/// Ordered intent list. Order is the matcher's tie-break: the first intent
/// with an accepted trigger wins, so reordering changes behavior.
#[derive(Debug, Clone)]
pub struct Catalog {
    intents: Vec<Intent>,
}

impl Catalog {
    pub fn new(intents: Vec<Intent>) -> Result<Self> {
        for (i, intent) in intents.iter().enumerate() {
            if intents[..i].iter().any(|other| other.id == intent.id) {
                return Err(Error::Catalog(format!("duplicate intent id '{}'", intent.id)));
            }
        }
        Ok(Self { intents })
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn get(&self, id: &str) -> Option<&Intent> {
        self.intents.iter().find(|intent| intent.id == id)
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// The English command set: clock, small talk, app launches, shutdown.
    pub fn builtin() -> Result<Self> {
        let launch = |target| vec![Response::Computed(Action::Launch(target))];

        Self::new(vec![
            Intent::new(
                "time",
                IntentKind::Conversational,
                [
                    "time",
                    "what time",
                    "what time is it",
                    "current time",
                    "tell me the time",
                    "whats the time",
                    "time right now",
                    "what is the time now",
                    "do you know the time",
                    "what's the current hour",
                    "check the clock",
                    "the time please",
                    "what hour is it",
                    "exact time now",
                    "time check",
                ],
                vec![
                    Response::clock("The time is {}", "%I:%M %p"),
                    Response::clock("Right now it's {}", "%I:%M %p"),
                    Response::clock("It's currently {}", "%I:%M %p"),
                    Response::clock("The current time is {}", "%I:%M %p"),
                ],
            )?,
            Intent::new(
                "date",
                IntentKind::Conversational,
                [
                    "date",
                    "what's the date",
                    "today's date",
                    "whats the date today",
                    "tell me the date",
                    "current date",
                    "what day is it",
                    "what day is today",
                    "what is today's date",
                    "can you tell me the date",
                    "date check",
                    "what day of the week",
                    "the date today",
                ],
                vec![
                    Response::clock("Today is {}", "%B %d, %Y"),
                    Response::clock("The date today is {}", "%B %d, %Y"),
                    Response::clock("It's {} today", "%B %d, %Y"),
                    Response::clock("Today's date is {}", "%A, %B %d, %Y"),
                ],
            )?,
            Intent::new(
                "how_are_you",
                IntentKind::Conversational,
                [
                    "how are you",
                    "how's it going",
                    "how do you feel",
                    "whats up",
                    "what's up",
                    "how you doing",
                    "how are things",
                    "how ya doing",
                    "you good",
                    "how's your day",
                    "what are you up to",
                    "how do you function",
                    "tell me how you feel",
                ],
                vec![
                    Response::literal("I'm just a bunch of code, but I'm running perfectly!"),
                    Response::literal("Feeling operational! Thanks for asking."),
                    Response::literal("All systems go. How can I assist you today?"),
                    Response::literal("Fantastic! Ready to help you!"),
                    Response::literal("I'm doing great, thanks for asking!"),
                ],
            )?,
            Intent::new(
                "joke",
                IntentKind::Conversational,
                [
                    "tell me a joke",
                    "joke",
                    "make me laugh",
                    "say something funny",
                    "i need a joke",
                    "got any jokes",
                    "tell a joke please",
                    "amuse me",
                    "crack a joke",
                    "say a funny thing",
                    "tell me a funny story",
                    "i'm bored tell a joke",
                    "make me chuckle",
                ],
                vec![
                    Response::literal(
                        "Why did the computer go to the doctor? Because it caught a virus!",
                    ),
                    Response::literal(
                        "Why do programmers prefer dark mode? Because light attracts bugs!",
                    ),
                    Response::literal("I would tell you a UDP joke, but you might not get it."),
                    Response::literal(
                        "Why do Java developers wear glasses? Because they can't C sharp!",
                    ),
                    Response::literal(
                        "How many programmers does it take to change a light bulb? None, that's a hardware problem!",
                    ),
                ],
            )?,
            Intent::new(
                "thanks",
                IntentKind::Conversational,
                [
                    "thank you",
                    "thanks",
                    "thx",
                    "thank you so much",
                    "thanks a lot",
                    "appreciate it",
                    "much appreciated",
                    "cheers",
                    "you're the best",
                    "thanks jarvis",
                    "good job",
                    "nice one",
                    "i thank you",
                    "i am grateful",
                    "many thanks",
                    "apology",
                    "i'm sorry",
                    "i am sorry",
                    "sorry",
                ],
                vec![
                    Response::literal("You're welcome!"),
                    Response::literal("No problem, happy to help!"),
                    Response::literal("Anytime, my friend."),
                    Response::literal("My pleasure!"),
                    Response::literal("Glad I could assist!"),
                    Response::literal("Understood, apology accepted."),
                ],
            )?,
            Intent::new(
                "hello",
                IntentKind::Conversational,
                [
                    "hello",
                    "hi",
                    "hey",
                    "hi there",
                    "greetings",
                    "hello jarvis",
                    "hey there",
                    "good day",
                    "howdy",
                    "what's up",
                    "hey assistant",
                    "good evening",
                    "good afternoon",
                    "morning",
                    "afternoon",
                    "good morning",
                    "top of the morning",
                    "good morning to you",
                ],
                vec![
                    Response::literal("Hello! How can I help you today?"),
                    Response::literal("Hi there! Great to see you!"),
                    Response::literal("Hey! What's on your mind?"),
                    Response::literal("Greetings! Ready to assist!"),
                    Response::literal("Hi! What can I do for you?"),
                    Response::literal("Good morning! Ready for a productive day?"),
                ],
            )?,
            Intent::new(
                "chrome",
                IntentKind::Launch,
                [
                    "open chrome",
                    "launch chrome",
                    "start chrome",
                    "chrome",
                    "google",
                    "open browser",
                    "start the browser",
                    "launch google chrome",
                    "open google",
                    "can you open chrome",
                ],
                launch(LaunchTarget::Chrome),
            )?,
            Intent::new(
                "youtube",
                IntentKind::Launch,
                [
                    "open youtube",
                    "youtube",
                    "launch youtube",
                    "start youtube",
                    "open videos",
                    "youtube videos",
                    "access youtube",
                    "go to youtube",
                    "launch the youtube website",
                ],
                launch(LaunchTarget::YouTube),
            )?,
            Intent::new(
                "itunes",
                IntentKind::Launch,
                [
                    "open itunes",
                    "itunes",
                    "launch itunes",
                    "start itunes",
                    "music",
                    "play music",
                    "open my music app",
                    "launch apple music",
                    "start apple music",
                    "can you open itunes",
                ],
                launch(LaunchTarget::ITunes),
            )?,
            Intent::new(
                "shut down",
                IntentKind::Shutdown,
                [
                    "shut down",
                    "stop",
                    "turn off",
                    "exit",
                    "quit",
                    "terminate",
                    "end program",
                    "close jarvis",
                    "stop listening",
                    "exit application",
                    "i'm done",
                    "goodbye and shut down",
                ],
                vec![Response::literal(FAREWELL)],
            )?,
        ])
    }
}
