// SPDX-License-Identifier: MIT OR Apache-2.0
//! Plain-text outline of a project, one line per element, port and connector.

use blocknet_component::ComponentSystem;
use blocknet_graph::{BindingState, Id, PortDirection, Project};
use std::fmt::Write;

const INDENT: &str = "  ";

/// Render the element hierarchy of `project`
pub fn outline(project: &Project) -> String {
    let mut out = String::new();
    for root in project.roots() {
        write_element(project, *root, 0, &mut out);
    }
    out
}

fn write_element(project: &Project, id: Id, depth: usize, out: &mut String) {
    let Some(element) = project.element(id) else {
        return;
    };
    let pad = INDENT.repeat(depth);
    let kind = if element.is_network() { "network" } else { "block" };
    let _ = write!(out, "{pad}{kind} {} [{id}]", element.name);
    if let Some(binding) = element.binding() {
        let name = project.components().name(binding.component).unwrap_or("?");
        let _ = write!(out, " -> {name}");
        if element.binding_state() != BindingState::Idle || !project.is_synchronized(id) {
            out.push_str(" (out of sync)");
        }
    }
    out.push('\n');

    for port in element.ports() {
        let Some(p) = project.port(*port) else {
            continue;
        };
        let arrow = match p.direction() {
            PortDirection::Input => "<",
            PortDirection::Output => ">",
        };
        let _ = writeln!(out, "{pad}{INDENT}{arrow} {} [{port}]", p.name);
    }

    if element.is_network() {
        for child in project.contained_elements(id) {
            write_element(project, *child, depth + 1, out);
        }
        for connector in project.contained_connectors(id) {
            let Some(c) = project.connector(*connector) else {
                continue;
            };
            let _ = writeln!(
                out,
                "{pad}{INDENT}{} -- {} [{connector}]",
                port_label(project, c.source()),
                port_label(project, c.target())
            );
        }
    }
}

fn port_label(project: &Project, port: Id) -> String {
    let Some(p) = project.port(port) else {
        return port.to_string();
    };
    let owner = p
        .parent_element()
        .and_then(|e| project.element(e))
        .map_or("?", |e| e.name.as_str());
    format!("{owner}.{}", p.name)
}
