use crate::inventory::{gauge_percent, partition};
use crate::models::{Filament, DEFAULT_COLOR};

pub fn render_index(records: &[Filament]) -> String {
    let split = partition(records, "");
    INDEX_HTML
        .replace("{{DEFAULT_COLOR}}", DEFAULT_COLOR)
        .replace("{{AVAILABLE_CARDS}}", &render_cards(&split.available, true))
        .replace("{{EMPTY_CARDS}}", &render_cards(&split.empty, false))
}

fn render_cards(records: &[&Filament], usable: bool) -> String {
    if records.is_empty() {
        let kind = if usable { "available" } else { "empty" };
        return format!("<p class=\"placeholder\">No {kind} filaments.</p>");
    }
    records
        .iter()
        .map(|record| render_card(record, usable))
        .collect()
}

fn render_card(record: &Filament, usable: bool) -> String {
    let color = match record.color.as_deref() {
        Some(color) if !color.is_empty() => color,
        _ => DEFAULT_COLOR,
    };
    let frame = if hex_brightness(color) > 125.0 {
        "dark"
    } else {
        "light"
    };
    let use_button = if usable {
        format!(
            "<button class=\"btn solid\" data-action=\"use\" data-id=\"{}\">Use Filament</button>",
            record.id.unwrap_or(0)
        )
    } else {
        String::new()
    };

    format!(
        "<div class=\"card\">\
         <div class=\"spool\">\
         <div class=\"spool-fill\" style=\"height:{percent:.0}%;background-color:{color}\"></div>\
         <div class=\"spool-frame {frame}\"></div>\
         </div>\
         <div class=\"card-name\">{name}</div>\
         <div class=\"card-line\">Brand: {brand}</div>\
         <div class=\"card-line\">Material: {material}</div>\
         <div class=\"card-line\">Current Mass: {mass:.2} g</div>\
         <div class=\"card-actions\">\
         <button class=\"btn outline\" data-action=\"info\" data-id=\"{id}\">More Info</button>\
         {use_button}\
         </div>\
         </div>",
        percent = gauge_percent(record),
        color = escape_html(color),
        frame = frame,
        name = escape_html(record.name.as_deref().unwrap_or("")),
        brand = escape_html(dash_if_blank(record.brand.as_deref().unwrap_or(""))),
        material = escape_html(dash_if_blank(record.material.as_deref().unwrap_or(""))),
        mass = record.current_grams().unwrap_or(0.0),
        id = record.id.unwrap_or(0),
        use_button = use_button,
    )
}

fn dash_if_blank(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// Perceived brightness of a hex color, 0..255. Unparsable input reads as 0,
// which picks the light spool frame.
fn hex_brightness(color: &str) -> f64 {
    let hex = color.trim().trim_start_matches('#');
    let expanded = if hex.len() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect::<String>()
    } else {
        hex.to_string()
    };
    if expanded.len() != 6 || !expanded.is_ascii() {
        return 0.0;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&expanded[range], 16).ok();
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => {
            0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)
        }
        _ => 0.0,
    }
}


const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Spooly - Filament Tracker</title>
  <style>
    :root {
      --bg: #ffffff;
      --ink: #111827;
      --card: #ffffff;
      --line: #d8d4e8;
      --accent: #7c3aed;
      --accent-ink: #ffffff;
      --muted: #6b7280;
      --shadow: 0 10px 30px rgba(17, 24, 39, 0.08);
    }

    .dark {
      --bg: #111827;
      --ink: #f9fafb;
      --card: #1f2937;
      --line: #374151;
      --accent: #a78bfa;
      --accent-ink: #111827;
      --muted: #9ca3af;
      --shadow: 0 10px 30px rgba(0, 0, 0, 0.45);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", Arial, sans-serif;
      padding: 20px;
      transition: background 200ms ease, color 200ms ease;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      margin-bottom: 16px;
    }

    h1 {
      margin: 0;
      font-size: 1.6rem;
    }

    h2 {
      font-size: 1.25rem;
      margin: 28px 0 12px;
    }

    .toolbar {
      display: flex;
      gap: 8px;
    }

    .btn {
      border-radius: 6px;
      padding: 9px 16px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      transition: background 150ms ease, color 150ms ease;
    }

    .btn.solid {
      background: var(--accent);
      border: 1px solid var(--accent);
      color: var(--accent-ink);
    }

    .btn.solid:hover {
      filter: brightness(1.1);
    }

    .btn.outline {
      background: transparent;
      border: 1px solid var(--accent);
      color: var(--accent);
    }

    .btn.outline:hover {
      background: var(--accent);
      color: var(--accent-ink);
    }

    input, textarea {
      width: 100%;
      border: 1px solid var(--line);
      border-radius: 6px;
      padding: 7px 10px;
      font-size: 0.95rem;
      background: var(--bg);
      color: var(--ink);
    }

    input:focus, textarea:focus {
      outline: 2px solid var(--accent);
      outline-offset: -1px;
    }

    textarea {
      resize: none;
    }

    #search {
      max-width: 420px;
      margin-bottom: 8px;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(200px, 1fr));
      gap: 16px;
    }

    .card {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 10px;
      box-shadow: var(--shadow);
      padding: 16px;
      display: flex;
      flex-direction: column;
      align-items: center;
      gap: 6px;
      max-width: 220px;
    }

    .card-name {
      font-weight: 600;
      text-align: center;
    }

    .card-line {
      font-size: 0.85rem;
      color: var(--muted);
      text-align: center;
    }

    .card-actions {
      display: flex;
      gap: 10px;
      margin-top: 10px;
    }

    .card-actions .btn {
      padding: 6px 12px;
      font-size: 0.85rem;
    }

    .spool {
      position: relative;
      width: 120px;
      height: 120px;
      border-radius: 10px;
      overflow: hidden;
    }

    .spool-fill {
      position: absolute;
      bottom: 0;
      left: 0;
      width: 100%;
      transition: height 500ms ease;
      filter: brightness(0.9);
      border-radius: 8px;
    }

    .spool-frame {
      position: absolute;
      inset: 6px;
      border-radius: 50%;
      pointer-events: none;
    }

    .spool-frame.light {
      border: 10px solid rgba(245, 245, 245, 0.92);
      box-shadow: inset 0 0 0 2px rgba(0, 0, 0, 0.15);
    }

    .spool-frame.dark {
      border: 10px solid rgba(30, 30, 30, 0.88);
      box-shadow: inset 0 0 0 2px rgba(255, 255, 255, 0.2);
    }

    .spool-frame::after {
      content: "";
      position: absolute;
      top: 50%;
      left: 50%;
      width: 26px;
      height: 26px;
      transform: translate(-50%, -50%);
      border-radius: 50%;
      background: var(--card);
      border: 2px solid var(--line);
    }

    .placeholder {
      color: var(--muted);
    }

    .overlay {
      position: fixed;
      inset: 0;
      background: rgba(0, 0, 0, 0.5);
      display: flex;
      align-items: center;
      justify-content: center;
      z-index: 50;
    }

    .modal {
      background: var(--card);
      border-radius: 12px;
      padding: 24px;
      width: min(560px, 92vw);
      max-height: 90vh;
      overflow: auto;
      box-shadow: var(--shadow);
    }

    .modal h2 {
      margin: 0 0 16px;
    }

    .modal-footer {
      margin-top: 20px;
      display: flex;
      justify-content: flex-end;
      gap: 12px;
    }

    .modal-footer.spread {
      justify-content: space-between;
    }

    .form-grid {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 14px;
    }

    .span-2 {
      grid-column: span 2;
    }

    .field {
      display: block;
    }

    .field-label {
      font-weight: 600;
      margin-bottom: 4px;
      font-size: 0.9rem;
    }

    .color-row {
      display: flex;
      align-items: center;
      gap: 8px;
    }

    .color-row input[type="color"] {
      width: 44px;
      height: 38px;
      padding: 2px;
      flex: none;
    }

    .hidden {
      display: none;
    }

    #intro {
      position: fixed;
      inset: 0;
      display: flex;
      align-items: center;
      justify-content: center;
      background: var(--bg);
      z-index: 60;
      transition: opacity 400ms ease;
    }

    #intro.gone {
      opacity: 0;
      pointer-events: none;
    }

    #intro h1 {
      font-size: 3.2rem;
      font-weight: 800;
      letter-spacing: 0.08em;
      color: var(--accent);
      animation: pop 500ms ease;
    }

    @keyframes pop {
      from {
        transform: scale(0);
      }
      to {
        transform: scale(1);
      }
    }
  </style>
</head>
<body>
  <div id="intro"><h1>Spooly</h1></div>

  <header>
    <h1>Spooly - Filament Tracker</h1>
    <div class="toolbar">
      <button class="btn outline" id="add-open" type="button">Add Filament</button>
      <button class="btn outline" id="settings-open" type="button">Settings</button>
    </div>
  </header>

  <input id="search" type="text" placeholder="Search filaments... (Name, Brand, Material)" />

  <h2>Available Filaments</h2>
  <div class="grid" id="available-grid">{{AVAILABLE_CARDS}}</div>

  <h2>Empty Filaments</h2>
  <div class="grid" id="empty-grid">{{EMPTY_CARDS}}</div>

  <div class="overlay hidden" id="overlay">
    <div class="modal" id="modal">
      <section class="modal-pane hidden" id="modal-add">
        <h2>Add New Filament</h2>
        <div class="form-grid">
          <label class="field">
            <div class="field-label">Name</div>
            <input id="add-name" type="text" />
          </label>
          <label class="field">
            <div class="field-label">Brand</div>
            <input id="add-brand" type="text" />
          </label>
          <label class="field">
            <div class="field-label">Color</div>
            <input id="add-color" type="color" value="{{DEFAULT_COLOR}}" />
          </label>
          <label class="field">
            <div class="field-label">Material</div>
            <input id="add-material" type="text" />
          </label>
          <label class="field">
            <div class="field-label">Start Mass (grams)</div>
            <input id="add-start-mass" type="number" value="1000" />
          </label>
          <label class="field">
            <div class="field-label">Copies</div>
            <input id="add-copies" type="number" min="1" value="1" />
          </label>
          <label class="field span-2">
            <div class="field-label">Notes</div>
            <textarea id="add-notes" rows="3"></textarea>
          </label>
        </div>
        <div class="modal-footer">
          <button class="btn outline" id="add-cancel" type="button">Cancel</button>
          <button class="btn solid" id="add-submit" type="button">Add</button>
        </div>
      </section>

      <section class="modal-pane hidden" id="modal-use">
        <h2>Use Filament</h2>
        <div id="use-name" style="margin-bottom:12px;font-weight:600"></div>
        <input id="use-input" type="number" placeholder="Grams used" />
        <div class="modal-footer">
          <button class="btn outline" id="use-cancel" type="button">Cancel</button>
          <button class="btn solid" id="use-submit" type="button">Update</button>
        </div>
      </section>

      <section class="modal-pane hidden" id="modal-info">
        <h2>More Info</h2>
        <div id="info-fields"></div>
        <div class="modal-footer spread">
          <button class="btn outline" id="info-close" type="button">Close</button>
          <button class="btn solid" id="info-delete" type="button">Delete</button>
        </div>
      </section>

      <section class="modal-pane hidden" id="modal-settings">
        <h2>Settings &amp; Data Import/Export</h2>
        <div class="field" style="margin-bottom:14px">
          <div class="field-label">Dark Mode</div>
          <input id="dark-toggle" type="checkbox" style="width:auto" />
        </div>
        <div class="field" style="margin-bottom:14px">
          <div class="field-label">Import Filaments (JSON)</div>
          <input id="import-input" type="file" accept=".json" />
        </div>
        <button class="btn solid" id="export-btn" type="button">Export Filaments</button>
        <div class="modal-footer">
          <button class="btn outline" id="settings-close" type="button">Close</button>
        </div>
      </section>
    </div>
  </div>

  <script>
    const API_BASE = '/api';
    const DEFAULT_COLOR = '{{DEFAULT_COLOR}}';

    let filaments = [];
    let search = '';
    // One modal at a time: {kind: 'none'|'add'|'use'|'info'|'settings', id}
    let modal = { kind: 'none', id: null };
    let darkMode = localStorage.getItem('spooly-dark') === 'true';

    const $ = (id) => document.getElementById(id);
    const availableGrid = $('available-grid');
    const emptyGrid = $('empty-grid');
    const overlay = $('overlay');

    const getBrightness = (hexColor) => {
      if (!hexColor) return 0;
      let c = hexColor.trim();
      if (c[0] === '#') c = c.slice(1);
      if (c.length === 3) c = c.split('').map((x) => x + x).join('');
      const r = parseInt(c.substring(0, 2), 16);
      const g = parseInt(c.substring(2, 4), 16);
      const b = parseInt(c.substring(4, 6), 16);
      if (Number.isNaN(r) || Number.isNaN(g) || Number.isNaN(b)) return 0;
      return 0.299 * r + 0.587 * g + 0.114 * b;
    };

    const isEmptySpool = (f) => typeof f.currentMass === 'number' && f.currentMass <= 0;

    const matchesSearch = (f) => {
      const q = search.toLowerCase();
      return (
        (f.name || '').toLowerCase().includes(q) ||
        (f.brand || '').toLowerCase().includes(q) ||
        (f.material || '').toLowerCase().includes(q)
      );
    };

    const percentLeft = (f) => {
      if (!f.startMass) return 0;
      const pct = ((f.currentMass ?? 0) / f.startMass) * 100;
      return Math.min(100, Math.max(0, pct));
    };

    const el = (tag, className, text) => {
      const node = document.createElement(tag);
      if (className) node.className = className;
      if (text !== undefined) node.textContent = text;
      return node;
    };

    const button = (label, className, onClick) => {
      const node = el('button', className, label);
      node.type = 'button';
      node.addEventListener('click', onClick);
      return node;
    };

    const buildCard = (f, usable) => {
      const card = el('div', 'card');
      const color = f.color || DEFAULT_COLOR;

      const spool = el('div', 'spool');
      const fill = el('div', 'spool-fill');
      // Empty spools show a full gauge so the card reads as a color swatch.
      fill.style.height = (isEmptySpool(f) ? 100 : percentLeft(f)) + '%';
      fill.style.backgroundColor = color;
      const frame = el('div', 'spool-frame ' + (getBrightness(color) > 125 ? 'dark' : 'light'));
      spool.append(fill, frame);

      const actions = el('div', 'card-actions');
      actions.append(button('More Info', 'btn outline', () => setModal({ kind: 'info', id: f.id })));
      if (usable) {
        actions.append(button('Use Filament', 'btn solid', () => setModal({ kind: 'use', id: f.id })));
      }

      card.append(
        spool,
        el('div', 'card-name', f.name || ''),
        el('div', 'card-line', 'Brand: ' + (f.brand || '-')),
        el('div', 'card-line', 'Material: ' + (f.material || '-')),
        el('div', 'card-line', 'Current Mass: ' + (f.currentMass ?? 0).toFixed(2) + ' g'),
        actions
      );
      return card;
    };

    const fillGrid = (grid, records, usable, emptyMessage) => {
      grid.textContent = '';
      if (!records.length) {
        grid.append(el('p', 'placeholder', emptyMessage));
        return;
      }
      for (const f of records) {
        grid.append(buildCard(f, usable));
      }
    };

    const render = () => {
      const filtered = filaments.filter(matchesSearch);
      fillGrid(availableGrid, filtered.filter((f) => !isEmptySpool(f)), true, 'No available filaments.');
      fillGrid(emptyGrid, filtered.filter(isEmptySpool), false, 'No empty filaments.');
    };

    const closeModal = () => setModal({ kind: 'none', id: null });

    const setModal = (next) => {
      modal = next;
      overlay.classList.toggle('hidden', modal.kind === 'none');
      for (const pane of document.querySelectorAll('.modal-pane')) {
        pane.classList.add('hidden');
      }
      if (modal.kind === 'add') $('modal-add').classList.remove('hidden');
      if (modal.kind === 'use') {
        populateUse();
        $('modal-use').classList.remove('hidden');
      }
      if (modal.kind === 'info') {
        populateInfo();
        $('modal-info').classList.remove('hidden');
      }
      if (modal.kind === 'settings') $('modal-settings').classList.remove('hidden');
    };

    const updateFilament = (id, data) =>
      fetch(`${API_BASE}/filaments/${id}`, {
        method: 'PUT',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(data)
      })
        .then((res) => {
          if (!res.ok) throw new Error('Update failed');
          return res.json();
        })
        .then((updated) => {
          filaments = filaments.map((f) => (f.id === updated.id ? updated : f));
          render();
          return updated;
        });

    const deleteFilament = (id) => {
      fetch(`${API_BASE}/filaments/${id}`, { method: 'DELETE' })
        .then((res) => {
          if (!res.ok) throw new Error('Delete failed');
          filaments = filaments.filter((f) => f.id !== id);
          render();
          closeModal();
        })
        .catch(() => alert('Failed to delete filament'));
    };

    const addFilament = () => {
      const name = $('add-name').value;
      if (!name.trim()) {
        alert('Please provide a filament name.');
        return;
      }
      const startMass = Number($('add-start-mass').value);
      const payload = {
        name,
        brand: $('add-brand').value,
        material: $('add-material').value,
        color: $('add-color').value,
        notes: $('add-notes').value,
        copies: Number($('add-copies').value) || 1,
        startMass,
        currentMass: startMass
      };
      fetch(`${API_BASE}/filaments`, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(payload)
      })
        .then((res) => res.json())
        .then((saved) => {
          filaments = [saved, ...filaments];
          resetAddForm();
          closeModal();
          render();
        });
    };

    const resetAddForm = () => {
      $('add-name').value = '';
      $('add-brand').value = '';
      $('add-material').value = '';
      $('add-color').value = DEFAULT_COLOR;
      $('add-start-mass').value = '1000';
      $('add-copies').value = '1';
      $('add-notes').value = '';
    };

    const populateUse = () => {
      const f = filaments.find((x) => x.id === modal.id);
      $('use-name').textContent = f ? f.name : 'Filament not found.';
      $('use-input').value = '';
    };

    const submitUse = () => {
      const used = Number($('use-input').value);
      if (Number.isNaN(used) || used <= 0) return;
      fetch(`${API_BASE}/filaments/${modal.id}/use`, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ grams: used })
      })
        .then((res) => {
          if (!res.ok) throw new Error('Update failed');
          return res.json();
        })
        .then((updated) => {
          filaments = filaments.map((f) => (f.id === updated.id ? updated : f));
          render();
        })
        .catch(() => {});
      closeModal();
    };

    const patchCurrent = (data) => {
      updateFilament(modal.id, data).catch(() => {});
    };

    const textField = (label, value, onChange, isTextArea) => {
      const wrap = el('label', 'field span-2');
      wrap.append(el('div', 'field-label', label));
      const input = isTextArea ? el('textarea') : el('input');
      if (isTextArea) input.rows = 3;
      input.value = value;
      let last = value;
      const submit = () => {
        if (input.value !== last) {
          last = input.value;
          onChange(input.value);
        }
      };
      input.addEventListener('blur', submit);
      if (!isTextArea) {
        input.addEventListener('keydown', (e) => {
          if (e.key === 'Enter') {
            e.preventDefault();
            submit();
          }
        });
      }
      wrap.append(input);
      return wrap;
    };

    const massField = (label, value, onChange) =>
      textField(label, String(value), (raw) => {
        const num = Number(raw);
        if (!Number.isNaN(num) && num >= 0) {
          onChange(num);
        }
      });

    const colorField = (f) => {
      const wrap = el('div', 'field span-2');
      wrap.append(el('div', 'field-label', 'Color'));
      const row = el('div', 'color-row');
      const picker = el('input');
      picker.type = 'color';
      picker.value = f.color || DEFAULT_COLOR;
      const text = el('input');
      text.type = 'text';
      text.placeholder = '#rrggbb';
      text.value = f.color || DEFAULT_COLOR;
      picker.addEventListener('change', () => {
        text.value = picker.value;
        patchCurrent({ color: picker.value });
      });
      text.addEventListener('change', () => {
        picker.value = text.value;
        patchCurrent({ color: text.value });
      });
      row.append(picker, text);
      wrap.append(row);
      return wrap;
    };

    const populateInfo = () => {
      const host = $('info-fields');
      host.textContent = '';
      const f = filaments.find((x) => x.id === modal.id);
      if (!f) {
        host.append(el('p', 'placeholder', 'Filament not found.'));
        return;
      }
      host.append(
        textField('Name', f.name || '', (v) => patchCurrent({ name: v })),
        textField('Brand', f.brand || '', (v) => patchCurrent({ brand: v })),
        textField('Material', f.material || '', (v) => patchCurrent({ material: v })),
        colorField(f),
        massField('Start Mass (grams)', f.startMass ?? 0, (n) => patchCurrent({ startMass: n })),
        massField('Current Mass (grams)', f.currentMass ?? 0, (n) => patchCurrent({ currentMass: n })),
        textField('Notes', f.notes || '', (v) => patchCurrent({ notes: v }), true)
      );
    };

    const handleImport = (event) => {
      const file = event.target.files[0];
      if (!file) return;
      const reader = new FileReader();
      reader.onload = (loaded) => {
        try {
          const imported = JSON.parse(loaded.target.result);
          if (!Array.isArray(imported)) throw new Error('Invalid data');
          fetch(`${API_BASE}/filaments/import`, {
            method: 'POST',
            headers: { 'content-type': 'application/json' },
            body: JSON.stringify(imported)
          }).then(() => {
            filaments = imported;
            closeModal();
            render();
          });
        } catch {
          alert('Invalid JSON file');
        }
      };
      reader.readAsText(file);
      event.target.value = '';
    };

    const handleExport = () => {
      const dataStr =
        'data:text/json;charset=utf-8,' + encodeURIComponent(JSON.stringify(filaments));
      const anchor = document.createElement('a');
      anchor.setAttribute('href', dataStr);
      anchor.setAttribute('download', 'filaments.json');
      anchor.click();
    };

    const applyDark = () => {
      document.documentElement.classList.toggle('dark', darkMode);
      localStorage.setItem('spooly-dark', darkMode);
      $('dark-toggle').checked = darkMode;
    };

    $('add-open').addEventListener('click', () => setModal({ kind: 'add', id: null }));
    $('settings-open').addEventListener('click', () => setModal({ kind: 'settings', id: null }));
    $('add-cancel').addEventListener('click', closeModal);
    $('add-submit').addEventListener('click', addFilament);
    $('use-cancel').addEventListener('click', closeModal);
    $('use-submit').addEventListener('click', submitUse);
    $('use-input').addEventListener('keydown', (e) => {
      if (e.key === 'Enter') submitUse();
    });
    $('info-close').addEventListener('click', closeModal);
    $('info-delete').addEventListener('click', () => {
      const f = filaments.find((x) => x.id === modal.id);
      if (!f) return;
      if (window.confirm(`Delete filament "${f.name}"? This action cannot be undone.`)) {
        deleteFilament(modal.id);
      }
    });
    $('settings-close').addEventListener('click', closeModal);
    $('dark-toggle').addEventListener('change', (e) => {
      darkMode = e.target.checked;
      applyDark();
    });
    $('import-input').addEventListener('change', handleImport);
    $('export-btn').addEventListener('click', handleExport);
    $('search').addEventListener('input', (e) => {
      search = e.target.value;
      render();
    });
    overlay.addEventListener('click', (e) => {
      if (e.target === overlay) closeModal();
    });

    // The server prerenders the grids; these handlers cover clicks before the
    // first client render replaces them.
    const delegate = (grid) => {
      grid.addEventListener('click', (e) => {
        const target = e.target.closest('button[data-action]');
        if (!target) return;
        setModal({ kind: target.dataset.action, id: Number(target.dataset.id) });
      });
    };
    delegate(availableGrid);
    delegate(emptyGrid);

    applyDark();
    setTimeout(() => {
      const intro = $('intro');
      intro.classList.add('gone');
      setTimeout(() => intro.remove(), 400);
    }, 2000);

    fetch(`${API_BASE}/filaments`)
      .then((res) => res.json())
      .then((data) => {
        filaments = data;
        render();
      })
      .catch(() => {
        filaments = [];
        render();
      });
  </script>
</body>
</html>
"##;
