//! The `/wormhole` application command.
//!
//! Administrators manage wormhole groups from any guild the bot is in:
//! - `/wormhole group create|delete|list`
//! - `/wormhole channel set|remove`
//! - `/wormhole slowmode set|remove`
//!
//! The command is registered globally, restricted to guilds and to members with the
//! Administrator permission by default. Guild owners can narrow it further in the
//! guild's integration settings.

use serenity::{
    all::{
        ChannelId, ChannelType, CommandDataOption, CommandDataOptionValue, CommandOptionType,
        CreateCommand, CreateCommandOption, GuildId, InteractionContext, Permissions,
    },
    http::Http,
};

use crate::{
    error::AppError,
    model::group::{AddWormholeChannelParam, WormholeGroup},
    service::group::{SlowmodeReport, WormholeGroupService, MAX_SLOWMODE_SECONDS},
};

pub const COMMAND_NAME: &str = "wormhole";

/// A parsed `/wormhole` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WormholeCommand {
    GroupCreate { name: String },
    GroupDelete { name: String },
    GroupList,
    /// Adds a channel of the invoking guild to a group.
    ChannelSet { group: String, channel_id: ChannelId },
    ChannelRemove { channel_id: ChannelId },
    SlowmodeSet { group: String, delay: i64 },
    SlowmodeRemove { group: String },
}

/// Builds the command registered with Discord.
pub fn create_command() -> CreateCommand {
    let group_option = || {
        CreateCommandOption::new(CommandOptionType::String, "group", "Wormhole group name")
            .required(true)
    };
    let channel_option = || {
        CreateCommandOption::new(CommandOptionType::Channel, "channel", "Text channel")
            .channel_types(vec![ChannelType::Text])
            .required(true)
    };

    CreateCommand::new(COMMAND_NAME)
        .description("Configure message relaying between guilds")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .contexts(vec![InteractionContext::Guild])
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommandGroup,
                "group",
                "Wormhole groups",
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "create",
                    "Create an empty wormhole group",
                )
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::String, "name", "Group name")
                        .required(true),
                ),
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "delete",
                    "Delete a wormhole group and unregister its channels",
                )
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::String, "name", "Group name")
                        .required(true),
                ),
            )
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "list",
                "List wormhole groups and their channels",
            )),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommandGroup,
                "channel",
                "Wormhole channels",
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "set",
                    "Relay messages of a channel within a wormhole group",
                )
                .add_sub_option(group_option())
                .add_sub_option(channel_option()),
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "remove",
                    "Stop relaying messages of a channel",
                )
                .add_sub_option(channel_option()),
            ),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommandGroup,
                "slowmode",
                "Slow mode of wormhole channels",
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "set",
                    "Apply slow mode to every channel of a group",
                )
                .add_sub_option(group_option())
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "delay",
                        "Time in seconds",
                    )
                    .min_int_value(0)
                    .max_int_value(MAX_SLOWMODE_SECONDS as u64)
                    .required(true),
                ),
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "remove",
                    "Disable slow mode in every channel of a group",
                )
                .add_sub_option(group_option()),
            ),
        )
}

impl WormholeCommand {
    /// Parses the options of a `/wormhole` invocation.
    ///
    /// # Returns
    /// - `Ok(WormholeCommand)` - The requested operation
    /// - `Err(AppError::BadRequest)` - Unknown subcommand or a missing argument, only
    ///   possible when the registered command is out of date
    pub fn parse(options: &[CommandDataOption]) -> Result<Self, AppError> {
        let Some(CommandDataOption {
            name: group_name,
            value: CommandDataOptionValue::SubCommandGroup(subcommands),
            ..
        }) = options.first()
        else {
            return Err(AppError::BadRequest("Missing subcommand group".to_string()));
        };

        let Some(CommandDataOption {
            name: subcommand,
            value: CommandDataOptionValue::SubCommand(args),
            ..
        }) = subcommands.first()
        else {
            return Err(AppError::BadRequest("Missing subcommand".to_string()));
        };

        match (group_name.as_str(), subcommand.as_str()) {
            ("group", "create") => Ok(Self::GroupCreate {
                name: string_arg(args, "name")?,
            }),
            ("group", "delete") => Ok(Self::GroupDelete {
                name: string_arg(args, "name")?,
            }),
            ("group", "list") => Ok(Self::GroupList),
            ("channel", "set") => Ok(Self::ChannelSet {
                group: string_arg(args, "group")?,
                channel_id: channel_arg(args, "channel")?,
            }),
            ("channel", "remove") => Ok(Self::ChannelRemove {
                channel_id: channel_arg(args, "channel")?,
            }),
            ("slowmode", "set") => Ok(Self::SlowmodeSet {
                group: string_arg(args, "group")?,
                delay: integer_arg(args, "delay")?,
            }),
            ("slowmode", "remove") => Ok(Self::SlowmodeRemove {
                group: string_arg(args, "group")?,
            }),
            (group_name, subcommand) => Err(AppError::BadRequest(format!(
                "Unknown subcommand {} {}",
                group_name, subcommand
            ))),
        }
    }

    /// Runs the command and returns the reply shown to the invoking administrator.
    ///
    /// Slow mode is only pushed to Discord when there is something to change, so a
    /// group without slow mode never needs the Manage Channels permission.
    ///
    /// # Arguments
    /// - `service` - Group management service
    /// - `http` - Discord HTTP client for slow mode changes
    /// - `guild_id` - Guild the command was invoked in
    pub async fn execute(
        &self,
        service: &WormholeGroupService<'_>,
        http: &Http,
        guild_id: GuildId,
    ) -> Result<String, AppError> {
        match self {
            Self::GroupCreate { name } => {
                let group = service.create_group(name).await?;
                Ok(format!("Created wormhole group `{}`.", group.name))
            }
            Self::GroupDelete { name } => {
                let group = service.group_by_name(name).await?;
                if group.slowmode > 0 {
                    let cleared = WormholeGroup {
                        slowmode: 0,
                        ..group.clone()
                    };
                    service.apply_slowmode(http, &cleared).await;
                }
                service.delete_group(group.id).await?;
                Ok(format!(
                    "Deleted wormhole group `{}` with {} channels.",
                    group.name,
                    group.channels.len()
                ))
            }
            Self::GroupList => Ok(list_reply(&service.list_groups().await?)),
            Self::ChannelSet { group, channel_id } => {
                let group = service.group_by_name(group).await?;
                service
                    .add_channel(AddWormholeChannelParam {
                        group_id: group.id,
                        guild_id: guild_id.get(),
                        channel_id: channel_id.get(),
                    })
                    .await?;

                let mut reply = format!(
                    "Messages in <#{}> are now relayed within wormhole group `{}`.",
                    channel_id, group.name
                );
                if group.slowmode > 0 {
                    let report = service
                        .apply_slowmode_to(http, &group, [*channel_id])
                        .await;
                    reply.push_str(&slowmode_warning(&report));
                }
                Ok(reply)
            }
            Self::ChannelRemove { channel_id } => {
                let group = service.group_of_channel(*channel_id).await?;
                if !service.remove_channel(channel_id.get()).await? {
                    return Ok(format!("<#{}> is not a wormhole channel.", channel_id));
                }

                let mut reply = format!("Messages in <#{}> are no longer relayed.", channel_id);
                if let Some(group) = group.filter(|group| group.slowmode > 0) {
                    let cleared = WormholeGroup { slowmode: 0, ..group };
                    let report = service
                        .apply_slowmode_to(http, &cleared, [*channel_id])
                        .await;
                    reply.push_str(&slowmode_warning(&report));
                }
                Ok(reply)
            }
            Self::SlowmodeSet { group, delay } => {
                let group = service.group_by_name(group).await?;
                let group = service.set_slowmode(group.id, *delay).await?;
                let report = service.apply_slowmode(http, &group).await;
                Ok(format!(
                    "Slow mode of wormhole group `{}` set to {}s on {} channels.{}",
                    group.name,
                    group.slowmode,
                    report.applied.len(),
                    slowmode_warning(&report)
                ))
            }
            Self::SlowmodeRemove { group } => {
                let group = service.group_by_name(group).await?;
                let group = service.set_slowmode(group.id, 0).await?;
                let report = service.apply_slowmode(http, &group).await;
                Ok(format!(
                    "Slow mode of wormhole group `{}` removed from {} channels.{}",
                    group.name,
                    report.applied.len(),
                    slowmode_warning(&report)
                ))
            }
        }
    }
}

fn find_arg<'a>(args: &'a [CommandDataOption], name: &str) -> Result<&'a CommandDataOptionValue, AppError> {
    args.iter()
        .find(|option| option.name == name)
        .map(|option| &option.value)
        .ok_or_else(|| AppError::BadRequest(format!("Missing argument {}", name)))
}

fn string_arg(args: &[CommandDataOption], name: &str) -> Result<String, AppError> {
    match find_arg(args, name)? {
        CommandDataOptionValue::String(value) => Ok(value.clone()),
        _ => Err(AppError::BadRequest(format!("Argument {} must be text", name))),
    }
}

fn channel_arg(args: &[CommandDataOption], name: &str) -> Result<ChannelId, AppError> {
    match find_arg(args, name)? {
        CommandDataOptionValue::Channel(channel_id) => Ok(*channel_id),
        _ => Err(AppError::BadRequest(format!("Argument {} must be a channel", name))),
    }
}

fn integer_arg(args: &[CommandDataOption], name: &str) -> Result<i64, AppError> {
    match find_arg(args, name)? {
        CommandDataOptionValue::Integer(value) => Ok(*value),
        _ => Err(AppError::BadRequest(format!("Argument {} must be a number", name))),
    }
}

fn list_reply(groups: &[WormholeGroup]) -> String {
    if groups.is_empty() {
        return "There are no wormhole groups.".to_string();
    }

    groups
        .iter()
        .map(|group| {
            let channels = if group.channels.is_empty() {
                "no channels".to_string()
            } else {
                group
                    .channel_ids()
                    .map(|channel_id| format!("<#{}>", channel_id))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            format!(
                "`{}` (slow mode {}s): {}",
                group.name, group.slowmode, channels
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn slowmode_warning(report: &SlowmodeReport) -> String {
    if report.failed.is_empty() {
        return String::new();
    }

    let channels = report
        .failed
        .iter()
        .map(|channel_id| format!("<#{}>", channel_id))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "\nSlow mode could not be changed in {}, check the Manage Channels permission.",
        channels
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_utils::{builder::TestBuilder, factory, serenity::create_test_command_data};

    use super::*;
    use crate::service::directory::GroupDirectory;

    fn parse(options: serde_json::Value) -> Result<WormholeCommand, AppError> {
        WormholeCommand::parse(&create_test_command_data(COMMAND_NAME, options).options)
    }

    fn subcommand(group: &str, name: &str, args: serde_json::Value) -> serde_json::Value {
        json!([{
            "name": group,
            "type": 2,
            "options": [{ "name": name, "type": 1, "options": args }],
        }])
    }

    /// Tests parsing `/wormhole channel set`.
    ///
    /// Expected: ChannelSet with the group name and channel ID
    #[test]
    fn parses_channel_set() {
        let command = parse(subcommand(
            "channel",
            "set",
            json!([
                { "name": "group", "type": 3, "value": "universities" },
                { "name": "channel", "type": 7, "value": "4242" },
            ]),
        ));

        assert_eq!(
            command.unwrap(),
            WormholeCommand::ChannelSet {
                group: "universities".to_string(),
                channel_id: ChannelId::new(4242),
            }
        );
    }

    /// Tests parsing `/wormhole slowmode set`.
    ///
    /// Expected: SlowmodeSet with the delay
    #[test]
    fn parses_slowmode_set() {
        let command = parse(subcommand(
            "slowmode",
            "set",
            json!([
                { "name": "group", "type": 3, "value": "universities" },
                { "name": "delay", "type": 4, "value": 30 },
            ]),
        ));

        assert_eq!(
            command.unwrap(),
            WormholeCommand::SlowmodeSet {
                group: "universities".to_string(),
                delay: 30,
            }
        );
    }

    /// Tests parsing `/wormhole group list`, which takes no arguments.
    ///
    /// Expected: GroupList
    #[test]
    fn parses_group_list() {
        let command = parse(subcommand("group", "list", json!([])));

        assert_eq!(command.unwrap(), WormholeCommand::GroupList);
    }

    /// Tests an invocation missing a required argument.
    ///
    /// Expected: Err(BadRequest)
    #[test]
    fn rejects_missing_argument() {
        let command = parse(subcommand(
            "channel",
            "set",
            json!([{ "name": "group", "type": 3, "value": "universities" }]),
        ));

        assert!(matches!(command, Err(AppError::BadRequest(_))));
    }

    /// Tests an invocation of a subcommand that is not registered.
    ///
    /// Expected: Err(BadRequest)
    #[test]
    fn rejects_unknown_subcommand() {
        let command = parse(subcommand("pattern", "set", json!([])));

        assert!(matches!(command, Err(AppError::BadRequest(_))));
    }

    /// Tests creating a group, adding a channel and listing the result.
    ///
    /// Expected: the channel is relayed right away and shows up in the listing
    #[tokio::test]
    async fn manages_group_through_commands() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_wormhole_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let directory = GroupDirectory::new();
        let service = WormholeGroupService::new(db, &directory);
        let http = Http::new("");
        let guild_id = GuildId::new(1);

        WormholeCommand::GroupCreate {
            name: "universities".to_string(),
        }
        .execute(&service, &http, guild_id)
        .await?;
        let reply = WormholeCommand::ChannelSet {
            group: "universities".to_string(),
            channel_id: ChannelId::new(42),
        }
        .execute(&service, &http, guild_id)
        .await?;

        assert!(reply.contains("<#42>"));
        assert!(directory.is_wormhole_channel(ChannelId::new(42)));

        let listing = WormholeCommand::GroupList
            .execute(&service, &http, guild_id)
            .await?;
        assert_eq!(listing, "`universities` (slow mode 0s): <#42>");

        Ok(())
    }

    /// Tests removing a channel through the command.
    ///
    /// Expected: the channel is no longer relayed, a second removal reports it
    #[tokio::test]
    async fn removes_channel_through_command() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_wormhole_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let directory = GroupDirectory::new();
        let service = WormholeGroupService::new(db, &directory);
        let http = Http::new("");
        let group = factory::create_group(db).await?;
        service
            .add_channel(AddWormholeChannelParam {
                group_id: group.id,
                guild_id: 1,
                channel_id: 42,
            })
            .await?;

        let command = WormholeCommand::ChannelRemove {
            channel_id: ChannelId::new(42),
        };
        let first = command.execute(&service, &http, GuildId::new(1)).await?;
        let second = command.execute(&service, &http, GuildId::new(1)).await?;

        assert_eq!(first, "Messages in <#42> are no longer relayed.");
        assert_eq!(second, "<#42> is not a wormhole channel.");
        assert!(!directory.is_wormhole_channel(ChannelId::new(42)));

        Ok(())
    }

    /// Tests commands naming a group that does not exist.
    ///
    /// Expected: Err(NotFound)
    #[tokio::test]
    async fn rejects_unknown_group() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_wormhole_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let directory = GroupDirectory::new();
        let service = WormholeGroupService::new(db, &directory);

        let result = WormholeCommand::SlowmodeRemove {
            group: "missing".to_string(),
        }
        .execute(&service, &Http::new(""), GuildId::new(1))
        .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));

        Ok(())
    }

    /// Tests setting slow mode on a group without channels.
    ///
    /// Expected: the delay is stored and no channel is touched
    #[tokio::test]
    async fn stores_slowmode_of_empty_group() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_wormhole_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let directory = GroupDirectory::new();
        let service = WormholeGroupService::new(db, &directory);
        let group = service.create_group("universities").await?;

        let reply = WormholeCommand::SlowmodeSet {
            group: group.name.clone(),
            delay: 60,
        }
        .execute(&service, &Http::new(""), GuildId::new(1))
        .await?;

        assert_eq!(
            reply,
            "Slow mode of wormhole group `universities` set to 60s on 0 channels."
        );
        assert_eq!(service.group_by_name("universities").await?.slowmode, 60);

        Ok(())
    }
}
