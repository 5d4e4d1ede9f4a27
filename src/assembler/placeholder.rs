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

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaceholderMode {
    Direct,
    Relative,
}

/// A reserved code-image word awaiting resolution in the second pass.
///
/// Rather than a pointer from placeholder to symbol, the placeholder stores
/// the referenced name and resolves it by table lookup at patch time — this
/// keeps the two passes decoupled and needs no forward-reference
/// bookkeeping.
#[derive(Debug, Clone)]
pub struct Placeholder {
    pub word_index: usize,
    pub instr_ic: i64,
    pub mode: PlaceholderMode,
    pub label: String,
    pub line: usize,
}
