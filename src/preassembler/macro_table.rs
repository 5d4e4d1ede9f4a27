/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use std::collections::HashMap;

pub struct MacroDef {
    pub body: Vec<String>,
}

#[derive(Default)]
pub struct MacroTable {
    map: HashMap<String, MacroDef>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `name` is already defined.
    pub fn define(&mut self, name: &str, body: Vec<String>) -> bool {
        if self.map.contains_key(name) {
            return false;
        }
        self.map.insert(name.to_string(), MacroDef { body });
        true
    }

    pub fn find(&self, name: &str) -> Option<&MacroDef> {
        self.map.get(name)
    }
}

/// 1-30 characters, first alphabetic, rest alphanumeric — the symbol-name
/// rule shared by labels, macro names, and extern/entry operands.
pub fn is_valid_name_shape(name: &str) -> bool {
    if name.is_empty() || name.len() > 30 {
        return false;
    }
    let mut chars = name.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    first_ok && chars.all(|c| c.is_ascii_alphanumeric())
}
