use indexmap::IndexMap;
use serde::Serialize;

/// Ansible dynamic inventory document, as printed for `--list`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Inventory {
    #[serde(rename = "_meta")]
    pub meta: Meta,
    /// Groups in output order, `vms` before `all`.
    #[serde(flatten)]
    pub groups: IndexMap<String, Group>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Meta {
    pub hostvars: IndexMap<String, HostVars>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Group {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vars: Option<GroupVars>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
}

/// Connection defaults shared by a group. `ansible_user` prints as `null` until known.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupVars {
    pub ansible_user: Option<String>,
    pub ansible_port: u16,
    pub ansible_ssh_common_args: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HostVars {
    pub ansible_host: String,
    pub ansible_user: String,
    pub ansible_port: u16,
    pub ansible_ssh_common_args: String,
    #[serde(rename = "_note", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
