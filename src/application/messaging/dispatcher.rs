//! Command dispatcher - routes command lines to handlers

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::application::composer::Composer;
use crate::domain::entities::{Audience, Identity, InboundMessage, ScriptVariant};
use crate::domain::traits::MessagingSession;

/// Static shape of a command: minimum argument count checked before any
/// semantic validation, and the usage line reported when it fails.
pub struct CommandSpec {
    pub name: &'static str,
    pub min_args: usize,
    pub usage: &'static str,
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "getgroup",
        min_args: 1,
        usage: "getgroup <jid>",
    },
    CommandSpec {
        name: "listgroup",
        min_args: 0,
        usage: "listgroup",
    },
    CommandSpec {
        name: "send-spoofed-reply",
        min_args: 4,
        usage: "send-spoofed-reply <chat_jid> <msgID:!|#ID> <spoofed_jid> <spoofed_text>|<text>",
    },
    CommandSpec {
        name: "send-spoofed-img-reply",
        min_args: 5,
        usage:
            "send-spoofed-img-reply <chat_jid> <msgID:!|#ID> <spoofed_jid> <spoofed_file> <spoofed_text>|<text>",
    },
    CommandSpec {
        name: "disparar",
        min_args: 4,
        usage: "disparar <audience:pv|girl> <variant:msg1|msg2> <chat_jid> <spoofed_jid>",
    },
    CommandSpec {
        name: "disparar-img",
        min_args: 5,
        usage: "disparar-img <audience:pv> <variant:msg1|msg2|msg3> <chat_jid> <spoofed_jid> <spoofed_img>",
    },
    CommandSpec {
        name: "spoofed-reply-this",
        min_args: 4,
        usage: "spoofed-reply-this <chat_jid> <msgID:!|#ID> <spoofed_jid> <text>",
    },
];

fn fail(output: String) -> String {
    tracing::error!("{}", output);
    output
}

fn ok(output: String) -> String {
    tracing::info!("{}", output);
    output
}

/// Rejoin the remaining tokens and split them on the first `|` into
/// (spoofed quoted text, actual reply text). No escaping exists for a
/// literal `|`.
fn split_compound(args: &[&str]) -> Option<(String, String)> {
    let joined = args.join(" ");
    let (quoted, reply) = joined.split_once('|')?;
    Some((quoted.to_string(), reply.to_string()))
}

/// Routes whitespace-tokenized command lines to handlers. Each command
/// performs at most one send and yields a single report string.
pub struct Dispatcher {
    session: Arc<dyn MessagingSession>,
    composer: Composer,
    specs: HashMap<&'static str, &'static CommandSpec>,
}

impl Dispatcher {
    pub fn new(session: Arc<dyn MessagingSession>) -> Self {
        let specs = COMMANDS.iter().map(|spec| (spec.name, spec)).collect();
        Self {
            composer: Composer::new(Arc::clone(&session)),
            session,
            specs,
        }
    }

    /// A `!`-prefixed message-ID argument means "mint a fresh ID";
    /// anything else passes through verbatim.
    fn resolve_message_id(&self, arg: &str) -> String {
        if arg.starts_with('!') {
            self.session.generate_message_id()
        } else {
            arg.to_string()
        }
    }

    /// Dispatch one command line. `reply_source` is the in-flight
    /// received message, when dispatch happens from an event context.
    pub async fn dispatch(&self, line: &str, reply_source: Option<&InboundMessage>) -> String {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return fail("\n[dispatch] No command given".to_string());
        };
        let args: Vec<&str> = tokens.collect();

        let Some(spec) = self.specs.get(name).copied() else {
            return fail(format!("\n[dispatch] Unknown command: {}", name));
        };
        if args.len() < spec.min_args {
            return fail(format!("\n[{}] Usage: {}", spec.name, spec.usage));
        }

        match spec.name {
            "getgroup" => self.cmd_get_group(&args).await,
            "listgroup" => self.cmd_list_groups().await,
            "send-spoofed-reply" => self.cmd_send_spoofed_reply(spec, &args).await,
            "send-spoofed-img-reply" => self.cmd_send_spoofed_img_reply(spec, &args).await,
            "disparar" => self.cmd_disparar(&args).await,
            "disparar-img" => self.cmd_disparar_img(&args).await,
            "spoofed-reply-this" => self.cmd_spoofed_reply_this(&args, reply_source).await,
            _ => unreachable!("command table and handler match are kept in sync"),
        }
    }

    async fn cmd_get_group(&self, args: &[&str]) -> String {
        let Ok(group) = Identity::resolve(args[0]) else {
            return fail("\n[getgroup] You need to specify a valid group JID".to_string());
        };
        if !group.is_group() {
            return fail(format!(
                "\n[getgroup] Input must be a group JID (@{})",
                crate::domain::entities::GROUP_SERVER
            ));
        }
        match self.session.get_group_info(&group).await {
            Ok(info) => ok(format!("\n[getgroup] Group info: {:?}", info)),
            Err(err) => fail(format!("\n[getgroup] Failed to get group info: {}", err)),
        }
    }

    async fn cmd_list_groups(&self) -> String {
        match self.session.list_joined_groups().await {
            Ok(groups) => {
                let mut output = String::new();
                for group in groups {
                    output = format!("{} \n[listgroup] {}: {}", output, group.name, group.jid);
                }
                ok(output)
            }
            Err(err) => fail(format!("\n[listgroup] Failed to get group list: {}", err)),
        }
    }

    async fn cmd_send_spoofed_reply(&self, spec: &CommandSpec, args: &[&str]) -> String {
        let Ok(chat) = Identity::resolve(args[0]) else {
            return fail(
                "\n[send-spoofed-reply] You need to specify a valid Chat ID (Group or User)"
                    .to_string(),
            );
        };
        let msg_id = self.resolve_message_id(args[1]);
        let Ok(spoofed) = Identity::resolve(args[2]) else {
            return fail(
                "\n[send-spoofed-reply] You need to specify a valid User ID to spoof".to_string(),
            );
        };
        let Some((spoofed_text, text)) = split_compound(&args[3..]) else {
            return fail(format!("\n[{}] Usage: {}", spec.name, spec.usage));
        };

        match self
            .composer
            .text_reply(&chat, &spoofed, &msg_id, &spoofed_text, &text)
            .await
        {
            Ok((_, receipt)) => ok(format!(
                "\n[send-spoofed-reply] mensagem disparada: {:?}",
                receipt
            )),
            Err(err) => fail(format!(
                "\n[send-spoofed-reply] Error on sending spoofed msg: {}",
                err
            )),
        }
    }

    async fn cmd_send_spoofed_img_reply(&self, spec: &CommandSpec, args: &[&str]) -> String {
        let Ok(chat) = Identity::resolve(args[0]) else {
            return fail(
                "\n[send-spoofed-img-reply] You need to specify a valid Chat ID (Group or User)"
                    .to_string(),
            );
        };
        let msg_id = self.resolve_message_id(args[1]);
        let Ok(spoofed) = Identity::resolve(args[2]) else {
            return fail(
                "\n[send-spoofed-img-reply] You need to specify a valid User ID to spoof"
                    .to_string(),
            );
        };
        let spoofed_file = args[3];
        let Some((spoofed_text, text)) = split_compound(&args[4..]) else {
            return fail(format!("\n[{}] Usage: {}", spec.name, spec.usage));
        };

        match self
            .composer
            .image_reply(
                &chat,
                &spoofed,
                &msg_id,
                Path::new(spoofed_file),
                &spoofed_text,
                &text,
            )
            .await
        {
            Ok((_, receipt)) => ok(format!(
                "\n[send-spoofed-img-reply] mensagem disparada: {:?}",
                receipt
            )),
            Err(err) => fail(format!(
                "\n[send-spoofed-img-reply] Error on sending spoofed msg: {}",
                err
            )),
        }
    }

    async fn cmd_disparar(&self, args: &[&str]) -> String {
        let Ok(_audience) = args[0].parse::<Audience>() else {
            return fail("\n[disparar] Error: <pv|girl>".to_string());
        };
        let variant = match args[1].parse::<ScriptVariant>() {
            Ok(variant) if variant != ScriptVariant::Msg3 => variant,
            _ => return fail("\n[disparar] Error: <msg1|msg2>".to_string()),
        };
        let Ok(chat) = Identity::resolve(args[2]) else {
            return fail(
                "\n[disparar] You need to specify a valid Chat ID (Group or User)".to_string(),
            );
        };
        let Ok(spoofed) = Identity::resolve(args[3]) else {
            return fail("\n[disparar] You need to specify a valid User ID to spoof".to_string());
        };

        // Fire-and-forget: send errors are logged by the composer and do
        // not change the report.
        let _ = self
            .composer
            .scripted_broadcast(&chat, &spoofed, variant)
            .await;
        ok(format!(
            "\n[disparar] mensagem disparada para {}, via ({} - num conectado)",
            chat, spoofed
        ))
    }

    async fn cmd_disparar_img(&self, args: &[&str]) -> String {
        // This handler only ever dispatches to private chats, unlike its
        // sibling; the narrower audience set is intentional.
        match args[0].parse::<Audience>() {
            Ok(Audience::Private) => {}
            _ => return fail("\n[disparar-img] Error: <pv>".to_string()),
        }
        let Ok(variant) = args[1].parse::<ScriptVariant>() else {
            return fail("\n[disparar-img] Error: <msg1|msg2|msg3>".to_string());
        };
        let Ok(chat) = Identity::resolve(args[2]) else {
            return fail(
                "\n[disparar-img] You need to specify a valid Chat ID (Group or User)".to_string(),
            );
        };
        let Ok(spoofed) = Identity::resolve(args[3]) else {
            return fail(
                "\n[disparar-img] You need to specify a valid User ID to spoof".to_string(),
            );
        };
        // The image argument is validated for presence only; the scripted
        // broadcast never attaches it.
        let _spoofed_img = args[4];

        let _ = self
            .composer
            .scripted_broadcast(&chat, &spoofed, variant)
            .await;
        ok(format!(
            "\n[disparar-img] disparar-img: mensagem disparada para {}, via ({} - num conectado)",
            chat, spoofed
        ))
    }

    async fn cmd_spoofed_reply_this(
        &self,
        args: &[&str],
        reply_source: Option<&InboundMessage>,
    ) -> String {
        let Some(source) = reply_source else {
            return fail("\n[spoofed-reply-this] No received message to reply to".to_string());
        };
        let Ok(chat) = Identity::resolve(args[0]) else {
            return fail(
                "\n[spoofed-reply-this] You need to specify a valid Chat ID (Group or User)"
                    .to_string(),
            );
        };
        let msg_id = self.resolve_message_id(args[1]);
        let Ok(spoofed) = Identity::resolve(args[2]) else {
            return fail(
                "\n[spoofed-reply-this] You need to specify a valid User ID to spoof".to_string(),
            );
        };
        let text = args[3..].join(" ");

        match self
            .composer
            .reply_from(&chat, &spoofed, &msg_id, &text, source)
            .await
        {
            Ok((_, receipt)) => ok(format!(
                "\n[spoofed-reply-this] mensagem disparada: {:?}",
                receipt
            )),
            Err(err) => fail(format!(
                "\n[spoofed-reply-this] Error on sending spoofed msg: {}",
                err
            )),
        }
    }
}
