//! Policy document assembly and JSON output.

use crate::config::PolicyTemplate;
use crate::models::{Campus, CidrBlock};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::io::Write;

/// Access policy with one statement per campus.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub id: String,
    pub statement: Vec<Statement>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub sid: String,
    pub effect: String,
    pub principal: String,
    pub action: String,
    pub resource: String,
    pub condition: Condition,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Condition {
    /// Tag key -> campus name.
    pub string_equals: BTreeMap<String, String>,
    /// Source IP key -> campus blocks.
    pub ip_address: BTreeMap<String, Vec<CidrBlock>>,
}

/// Build the policy: one statement per campus, in campus order.
pub fn build_policy(template: &PolicyTemplate, campuses: &[Campus]) -> PolicyDocument {
    log::info!("#Start build_policy() for {} campus(es)", campuses.len());
    let st = &template.statement;

    let statement = campuses
        .iter()
        .map(|campus| Statement {
            sid: st.sid.clone(),
            effect: st.effect.clone(),
            principal: st.principal.clone(),
            action: st.action.clone(),
            resource: st.resource.clone(),
            condition: Condition {
                string_equals: BTreeMap::from([(st.tag_key.clone(), campus.name.clone())]),
                ip_address: BTreeMap::from([(st.source_ip_key.clone(), campus.ranges.clone())]),
            },
        })
        .collect();

    PolicyDocument {
        version: template.version.clone(),
        id: template.id.clone(),
        statement,
    }
}

/// Write the policy as JSON indented by four spaces, with a trailing newline.
pub fn write_policy<W: Write>(policy: &PolicyDocument, mut writer: W) -> Result<(), Box<dyn Error>> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    policy
        .serialize(&mut serializer)
        .map_err(|e| format!("Error serializing policy JSON: {e}"))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
