//! Gateway - line-delimited JSON event stream driving the router.
//!
//! Each line is one [`Frame`]. World frames (`user`, `channel`) register
//! objects on the in-process platform; `message` frames become
//! [`IncomingMessage`]s queued to a per-author worker task, so one author's
//! messages are handled in arrival order while different authors proceed
//! concurrently; `command` frames run in arrival order and their replies are
//! logged.
//!
//! ```text
//! {"op":"user","id":42,"tag":"alice#0001"}
//! {"op":"channel","id":7,"kind":"text","guild":1,"name":"modmail"}
//! {"op":"command","guild":1,"invoker":{"id":9,"tag":"mod#0001"},"command":{"name":"setup","channel":7}}
//! {"op":"message","author":42,"content":"hello"}
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span, instrument, warn};

use crate::events::{CommandInvocation, IncomingMessage};
use crate::handlers::Router;
use crate::platform::memory::MemoryPlatform;
use crate::platform::{
    Author, Channel, ChannelId, ChannelKind, GuildId, Messenger, PlatformError, UserId,
};

/// One gateway event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Frame {
    User(Author),
    Channel {
        id: ChannelId,
        kind: ChannelKind,
        #[serde(default)]
        guild: Option<GuildId>,
        #[serde(default)]
        name: String,
    },
    /// A posted message. Without `channel` it is a direct message to the bot.
    Message {
        #[serde(default)]
        channel: Option<ChannelId>,
        author: UserId,
        content: String,
        #[serde(default)]
        moderator: bool,
    },
    Command(CommandInvocation),
}

/// Counters reported when the stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatewayStats {
    pub frames: usize,
    pub malformed: usize,
    pub dropped: usize,
}

pub struct Gateway {
    router: Arc<Router>,
    platform: Arc<MemoryPlatform>,
}

impl Gateway {
    pub fn new(router: Arc<Router>, platform: Arc<MemoryPlatform>) -> Self {
        Self { router, platform }
    }

    /// Consume frames until end of stream, then wait for in-flight events.
    #[instrument(skip_all, name = "gateway")]
    pub async fn run<R>(self, reader: R) -> std::io::Result<GatewayStats>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut tasks = JoinSet::new();
        let mut queues: HashMap<UserId, mpsc::UnboundedSender<IncomingMessage>> = HashMap::new();
        let mut stats = GatewayStats::default();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            stats.frames += 1;

            let frame = match serde_json::from_str::<Frame>(line) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(error = %e, "Malformed frame");
                    stats.malformed += 1;
                    continue;
                }
            };

            match frame {
                Frame::User(author) => {
                    debug!(user = %author.id, tag = %author.tag, "User registered");
                    self.platform.insert_user(author);
                }
                Frame::Channel {
                    id,
                    kind,
                    guild,
                    name,
                } => {
                    debug!(channel = %id, ?kind, "Channel registered");
                    self.platform.insert_channel(Channel { id, kind, guild }, &name);
                }
                Frame::Message {
                    channel,
                    author,
                    content,
                    moderator,
                } => match self.resolve(channel, author, content, moderator).await {
                    Ok(msg) => self.enqueue(&mut queues, &mut tasks, msg),
                    Err(e) => {
                        warn!(error = %e, code = e.error_code(), "Dropping unresolvable message");
                        stats.dropped += 1;
                    }
                },
                Frame::Command(invocation) => {
                    let reply = self.router.handle_command(invocation).await;
                    info!(success = reply.success, reply = %reply.content, "Command reply");
                }
            }

            while let Some(done) = tasks.try_join_next() {
                if let Err(e) = done {
                    error!(error = %e, "Event task failed");
                }
            }
        }

        // Closing the queues lets each worker finish its backlog and exit.
        drop(queues);
        let pending = tasks.len();
        async {
            while let Some(done) = tasks.join_next().await {
                if let Err(e) = done {
                    error!(error = %e, "Event task failed");
                }
            }
        }
        .instrument(info_span!("drain", pending))
        .await;

        info!(
            frames = stats.frames,
            malformed = stats.malformed,
            dropped = stats.dropped,
            "Event stream closed"
        );
        Ok(stats)
    }

    /// Hand `msg` to its author's worker, starting one on first use.
    fn enqueue(
        &self,
        queues: &mut HashMap<UserId, mpsc::UnboundedSender<IncomingMessage>>,
        tasks: &mut JoinSet<()>,
        msg: IncomingMessage,
    ) {
        let author = msg.author.id;
        let msg = match queues.get(&author) {
            Some(queue) => match queue.send(msg) {
                Ok(()) => return,
                Err(mpsc::error::SendError(msg)) => {
                    warn!(user = %author, "Author worker gone, restarting");
                    msg
                }
            },
            None => msg,
        };

        let (queue, mut backlog) = mpsc::unbounded_channel::<IncomingMessage>();
        let router = Arc::clone(&self.router);
        tasks.spawn(
            async move {
                while let Some(msg) = backlog.recv().await {
                    router.handle_message(msg).await;
                }
            }
            .instrument(info_span!("author", user = %author)),
        );
        if queue.send(msg).is_err() {
            error!(user = %author, "Author worker closed before first message");
        }
        queues.insert(author, queue);
    }

    async fn resolve(
        &self,
        channel: Option<ChannelId>,
        author: UserId,
        content: String,
        moderator: bool,
    ) -> Result<IncomingMessage, PlatformError> {
        let author = self
            .platform
            .fetch_user(author)
            .await?
            .ok_or(PlatformError::UnknownUser(author))?;
        let channel = match channel {
            Some(id) => self
                .platform
                .fetch_channel(id)
                .await?
                .ok_or(PlatformError::UnknownChannel(id))?,
            None => self.platform.direct_channel(author.id).await?,
        };
        let message = self.platform.post_incoming(channel.id, author.id, &content);
        Ok(IncomingMessage {
            message,
            author,
            channel,
            content,
            author_is_moderator: moderator,
        })
    }
}
