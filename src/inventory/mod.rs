pub mod types;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::config::{Config, GroupUserPolicy};
use crate::terraform::types::{output_value, OutputSet, VmRecord};
use types::{Group, GroupVars, HostVars, Inventory, Meta};

/// Group every Terraform VM is placed in.
pub const VMS_GROUP: &str = "vms";

pub const PLACEHOLDER_NOTE: &str =
    "IP address not set - update Terraform output or use static inventory";

/// Inventory printed when Terraform has nothing to offer at all.
pub fn empty_inventory() -> Inventory {
    let mut groups = IndexMap::new();
    groups.insert(
        VMS_GROUP.to_string(),
        Group {
            hosts: Some(Vec::new()),
            ..Group::default()
        },
    );
    groups.insert("all".to_string(), all_group());

    Inventory {
        meta: Meta::default(),
        groups,
    }
}

/// Map Terraform outputs onto an Ansible inventory.
///
/// Without outputs, or without the configured VM output, the result is the
/// bare skeleton: no hosts, group vars with an unset user.
pub fn build_inventory(outputs: Option<&OutputSet>, config: &Config) -> Inventory {
    let mut hosts = Vec::new();
    let mut hostvars = IndexMap::new();
    let mut users = Vec::new();

    let vms = outputs.and_then(|o| output_value(o, &config.output_name));

    match vms {
        None => debug!("no `{}` output, emitting empty inventory", config.output_name),
        Some(serde_json::Value::Null) => debug!("`{}` output has no value", config.output_name),
        Some(serde_json::Value::Object(map)) => {
            for (name, raw) in map {
                let record = VmRecord::from_value(raw);
                let vars = resolve_host(name, record, config);

                users.push(vars.ansible_user.clone());
                hosts.push(name.clone());
                hostvars.insert(name.clone(), vars);
            }
        }
        Some(other) => warn!(
            "`{}` output value is not an object ({}), ignoring it",
            config.output_name,
            json_kind(other)
        ),
    }

    let ansible_user = config
        .group_user
        .clone()
        .or_else(|| group_user(&users, config.group_user_policy));

    let mut groups = IndexMap::new();
    groups.insert(
        VMS_GROUP.to_string(),
        Group {
            hosts: Some(hosts),
            vars: Some(GroupVars {
                ansible_user,
                ansible_port: config.ssh_port,
                ansible_ssh_common_args: config.ssh_common_args.clone(),
            }),
            children: None,
        },
    );
    groups.insert("all".to_string(), all_group());

    Inventory {
        meta: Meta { hostvars },
        groups,
    }
}

fn all_group() -> Group {
    Group {
        children: Some(vec![VMS_GROUP.to_string()]),
        ..Group::default()
    }
}

fn resolve_host(name: &str, record: VmRecord, config: &Config) -> HostVars {
    let ansible_user = record
        .ssh_user
        .unwrap_or_else(|| config.default_ssh_user.clone());
    let address = record.ansible_host.unwrap_or_default();

    let (ansible_host, note) = if is_placeholder(&address) {
        debug!("{name}: placeholder address {address}, using the VM name");
        (name.to_string(), Some(PLACEHOLDER_NOTE.to_string()))
    } else {
        (address, None)
    };

    HostVars {
        ansible_host,
        ansible_user,
        ansible_port: config.ssh_port,
        ansible_ssh_common_args: config.ssh_common_args.clone(),
        note,
    }
}

/// Terraform modules publish `<...>` until a real address is known.
pub fn is_placeholder(value: &str) -> bool {
    value.starts_with('<') && value.ends_with('>')
}

fn group_user(users: &[String], policy: GroupUserPolicy) -> Option<String> {
    match policy {
        GroupUserPolicy::First => users.first().cloned(),
        GroupUserPolicy::MostFrequent => {
            let mut counts: IndexMap<&str, usize> = IndexMap::new();
            for user in users {
                *counts.entry(user.as_str()).or_default() += 1;
            }

            let mut best: Option<(&str, usize)> = None;
            for (user, count) in counts {
                if !matches!(best, Some((_, n)) if n >= count) {
                    best = Some((user, count));
                }
            }
            best.map(|(user, _)| user.to_string())
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
