//! Command-line shell over `contactbook_core`.
//!
//! # Responsibility
//! - Expose the list/detail/edit/delete and group flows from a terminal.
//! - Keep all business rules in core; this binary only parses and prints.

use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use contactbook_core::db::{open_db, DB_FILE_NAME};
use contactbook_core::{
    default_log_level, init_logging, sort_for_sections, Contact, ContactDraft, ContactListQuery,
    ContactService, DeleteConfirmation, GroupFilter, LoggingConfig, PinyinRomanizer,
    SectionEntry, SectionedList, SqliteContactRepository, SqliteGroupRepository, UNGROUPED_ID,
};
use log::info;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "contactbook", version, about = "Contacts with alphabetic sections")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "CONTACTBOOK_DB", default_value = DB_FILE_NAME)]
    db: PathBuf,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "CONTACTBOOK_LOG_DIR")]
    log_dir: Option<PathBuf>,
    #[arg(long, env = "CONTACTBOOK_LOG_LEVEL", default_value = default_log_level())]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the sectioned contact list.
    List {
        /// Emit section entries as JSON.
        #[arg(long)]
        json: bool,
        /// Only contacts of this group (`-1` for ungrouped).
        #[arg(long, allow_hyphen_values = true)]
        group: Option<i64>,
    },
    /// Show one contact.
    Show { id: i64 },
    /// Create a contact.
    Add(ContactFields),
    /// Edit a contact; omitted fields keep their current value.
    Edit {
        id: i64,
        #[command(flatten)]
        fields: ContactFields,
    },
    /// Delete a contact.
    Delete {
        id: i64,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Print the section that starts with LETTER.
    Jump { letter: char },
    /// Manage groups.
    #[command(subcommand)]
    Group(GroupCommand),
}

#[derive(Debug, Args)]
struct ContactFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
    /// Group id; `-1` clears the group.
    #[arg(long, allow_hyphen_values = true)]
    group: Option<i64>,
    /// Photo URI or path; an empty value clears it.
    #[arg(long)]
    photo: Option<String>,
}

impl ContactFields {
    fn apply_to(self, mut draft: ContactDraft) -> ContactDraft {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(phone) = self.phone {
            draft.phone = phone;
        }
        if let Some(email) = self.email {
            draft.email = email;
        }
        if let Some(group) = self.group {
            draft = draft.group(group);
        }
        if let Some(photo) = self.photo {
            draft.photo_ref = Some(photo);
        }
        draft
    }
}

#[derive(Debug, Subcommand)]
enum GroupCommand {
    List,
    Add { name: String },
    Rename { id: i64, name: String },
    /// Delete a group together with its contacts.
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_ref() {
        let config = LoggingConfig::new(&cli.log_level, log_dir)
            .map_err(|err| anyhow!("invalid logging config: {err}"))?;
        init_logging(&config).map_err(|err| anyhow!("logging init failed: {err}"))?;
    }

    let conn = open_db(&cli.db)?;
    let service = ContactService::new(
        SqliteContactRepository::try_new(&conn)?,
        SqliteGroupRepository::try_new(&conn)?,
    );
    info!("event=cli_command module=cli status=start");

    match cli.command {
        Command::List { json, group } => {
            let contacts = match group {
                None => service.snapshot()?,
                Some(group) => {
                    let filter = if group == UNGROUPED_ID {
                        GroupFilter::Ungrouped
                    } else {
                        GroupFilter::Group(group)
                    };
                    let mut contacts =
                        service.list_contacts(&ContactListQuery { group: filter })?;
                    sort_for_sections(&mut contacts, &PinyinRomanizer);
                    contacts
                }
            };
            let mut list = SectionedList::new();
            list.apply_snapshot(&contacts);
            if json {
                println!("{}", serde_json::to_string_pretty(list.entries())?);
            } else {
                print_entries(list.entries());
                println!("index: {}", list.labels().join(" "));
            }
        }
        Command::Show { id } => {
            let contact = service
                .get_contact(id)?
                .ok_or_else(|| anyhow!("contact not found: {id}"))?;
            print_detail(&contact);
        }
        Command::Add(fields) => {
            let contact = service.create_contact(fields.apply_to(ContactDraft::default()))?;
            println!("created contact {}", contact.id);
        }
        Command::Edit { id, fields } => {
            let current = service
                .get_contact(id)?
                .ok_or_else(|| anyhow!("contact not found: {id}"))?;
            let draft = fields.apply_to(draft_from(current));
            let contact = service.update_contact(id, draft)?;
            print_detail(&contact);
        }
        Command::Delete { id, yes } => {
            if !yes {
                bail!("refusing to delete contact {id} without --yes");
            }
            service.delete_contact(id, DeleteConfirmation::from(yes))?;
            println!("deleted contact {id}");
        }
        Command::Jump { letter } => {
            let mut list = SectionedList::new();
            list.apply_snapshot(&service.snapshot()?);
            let Some(start) = list.position_for_section(letter) else {
                bail!("no contacts under `{letter}`");
            };
            let section = list.entries()[start..]
                .iter()
                .enumerate()
                .take_while(|(offset, entry)| *offset == 0 || !entry.is_header())
                .map(|(_, entry)| entry.clone())
                .collect::<Vec<_>>();
            println!("position {start}");
            print_entries(&section);
        }
        Command::Group(command) => run_group_command(&service, command)?,
    }

    Ok(())
}

fn run_group_command(
    service: &ContactService<SqliteContactRepository<'_>, SqliteGroupRepository<'_>>,
    command: GroupCommand,
) -> Result<()> {
    match command {
        GroupCommand::List => {
            for group in service.list_groups()? {
                println!("[{}] {}", group.id, group.name);
            }
        }
        GroupCommand::Add { name } => {
            let group = service.create_group(&name)?;
            println!("created group {}", group.id);
        }
        GroupCommand::Rename { id, name } => {
            let group = service.rename_group(id, &name)?;
            println!("renamed group {} to {}", group.id, group.name);
        }
        GroupCommand::Delete { id, yes } => {
            if !yes {
                bail!("refusing to delete group {id} without --yes");
            }
            let removed = service.delete_group(id, DeleteConfirmation::from(yes))?;
            println!("deleted group {id} and {removed} contact(s)");
        }
    }
    Ok(())
}

fn draft_from(contact: Contact) -> ContactDraft {
    ContactDraft {
        name: contact.name,
        phone: contact.phone,
        email: contact.email,
        group_id: contact.group_id,
        photo_ref: contact.photo_ref,
    }
}

fn print_entries(entries: &[SectionEntry]) {
    for entry in entries {
        match entry {
            SectionEntry::Header { label } => println!("{label}"),
            SectionEntry::Item { contact } => println!(
                "  [{}] {}  {}",
                contact.id,
                display_name(contact),
                contact.phone
            ),
        }
    }
}

fn print_detail(contact: &Contact) {
    println!("id:    {}", contact.id);
    println!("name:  {}", display_name(contact));
    println!("phone: {}", contact.phone);
    println!("email: {}", contact.email);
    println!(
        "group: {}",
        contact.group_name.as_deref().unwrap_or("(ungrouped)")
    );
    if let Some(photo) = contact.photo_ref.as_deref() {
        println!("photo: {photo}");
    }
}

fn display_name(contact: &Contact) -> &str {
    if contact.name.is_empty() {
        "(no name)"
    } else {
        &contact.name
    }
}
