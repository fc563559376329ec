// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::error::Result;
use crate::filter::TopicFilter;
use crate::message::Message;
use crate::severity::Severity;
use std::fmt::Debug;

/**
A destination for messages, paired with the filter that decides which messages it takes.

Implementors provide [`write`](Self::write) and the two filter accessors; [`emit`](Self::emit)
composes them.

```
use topicwise::{Handler, InMemoryHandler, Message, Severity, Topic, TopicFilter};

let handler = InMemoryHandler::new(Severity::Warning, TopicFilter::all());
handler.emit(&Message::new("quiet", Severity::Debug, Topic::new("t"))).unwrap();
handler.emit(&Message::new("loud", Severity::Warning, Topic::new("t"))).unwrap();
assert_eq!(handler.records(), ["[WARNING] t\nloud\n\n"]);
```
*/
pub trait Handler: Debug + Send + Sync {
    /// Lowest severity this handler writes.
    fn min_severity(&self) -> Severity;

    fn filter(&self) -> &TopicFilter;

    /**
    Writes a message that already passed [`accepts`](Self::accepts).

    Called by `emit`; call it directly only to bypass filtering.
    */
    fn write(&self, message: &Message) -> Result<()>;

    /// Severity first, then topic.
    fn accepts(&self, message: &Message) -> bool {
        message.severity() >= self.min_severity() && self.filter().matches(message.topic())
    }

    /**
    Writes the message if the handler accepts it.

    A message that is filtered out is not an error; only a failing write is.
    */
    fn emit(&self, message: &Message) -> Result<()> {
        if self.accepts(message) {
            self.write(message)
        } else {
            Ok(())
        }
    }
}

/*
Boilerplate notes.

# Handler

Handlers own a sink, so Clone is out for the trait in general; concrete handlers decide.
PartialEq/Eq raise the data-vs-provenance question again; skip.
Default is not meaningful: a file handler needs a file.
Send/Sync are required since one logger is shared by every thread.
*/
