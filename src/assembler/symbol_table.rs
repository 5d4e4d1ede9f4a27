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

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SymbolAttr {
    Code,
    Data,
    Extern,
    Entry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub value: i64,
    pub attr: SymbolAttr,
}

pub enum MarkEntryResult {
    Ok,
    NotFound,
    ExternCannotBeEntry,
}

/// Insertion-ordered name → symbol mapping.
///
/// A plain `HashMap` would lose the source order the data model calls for,
/// so lookups go through a name index into an append-only `Vec`.
#[derive(Debug, Default)]
pub struct SymbolTable {
    order: Vec<Symbol>,
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `name` is already present.
    pub fn add(&mut self, name: &str, value: i64, attr: SymbolAttr) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        let idx = self.order.len();
        self.order.push(Symbol { value, attr });
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        true
    }

    pub fn find(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.order[i])
    }

    /// Adds `offset` to every `Data`-attributed symbol's value. Must run
    /// exactly once, after the first pass completes with zero errors.
    pub fn relocate_data_symbols(&mut self, offset: i64) {
        for sym in &mut self.order {
            if sym.attr == SymbolAttr::Data {
                sym.value += offset;
            }
        }
    }

    pub fn mark_entry(&mut self, name: &str) -> MarkEntryResult {
        let Some(&idx) = self.index.get(name) else {
            return MarkEntryResult::NotFound;
        };
        let sym = &mut self.order[idx];
        if sym.attr == SymbolAttr::Extern {
            return MarkEntryResult::ExternCannotBeEntry;
        }
        sym.attr = SymbolAttr::Entry;
        MarkEntryResult::Ok
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.names.iter().map(String::as_str).zip(self.order.iter())
    }
}
