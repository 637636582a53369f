//! Server-rendered HTML. Pages are deliberately plain: a shared shell,
//! tables and forms, and the thin scripts the app needs (calendar
//! widget, cashflow delete, notes offline sync).

use axum::response::Html;

use teamdesk_db::models::{EventRow, NoteRow, UserRow};
use teamdesk_ledger::{BalancedEntry, CategoryFilter};
use teamdesk_types::{Category, EventCategory, Role, SessionUser};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f8fafc; color: #1e293b; }
nav { background: #0f172a; color: #e2e8f0; padding: 0.6rem 1rem; display: flex; gap: 1rem; align-items: center; flex-wrap: wrap; }
nav a { color: #cbd5e1; text-decoration: none; }
nav a:hover { color: #fff; }
nav .brand { font-weight: bold; color: #fff; }
nav .who { margin-left: auto; font-size: 0.85rem; color: #94a3b8; }
nav form { margin: 0; }
main { padding: 1.25rem; max-width: 960px; margin: 0 auto; }
table { border-collapse: collapse; width: 100%; background: #fff; }
th, td { border-bottom: 1px solid #e2e8f0; padding: 0.5rem 0.75rem; text-align: left; font-size: 0.9rem; }
th { background: #f1f5f9; text-transform: uppercase; font-size: 0.7rem; color: #475569; }
td.num, th.num { text-align: right; }
.in { color: #059669; }
.out { color: #dc2626; }
.tabs a { margin-right: 0.75rem; text-decoration: none; color: #2563eb; }
.tabs a.active { font-weight: bold; color: #0f172a; }
.cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(160px, 1fr)); gap: 0.75rem; margin-top: 1rem; }
.card { background: #fff; border: 1px solid #e2e8f0; border-radius: 8px; padding: 0.75rem; cursor: pointer; }
.card.folder { background: #fef3c7; border-color: #fcd34d; font-weight: bold; }
.editor { margin-top: 1rem; background: #fff; border: 1px solid #e2e8f0; border-radius: 8px; padding: 1rem; }
.editor input, .editor textarea { width: 100%; box-sizing: border-box; margin-bottom: 0.5rem; padding: 0.4rem; }
.editor textarea { min-height: 10rem; }
.widget { display: inline-block; background: #fff; border: 1px solid #e2e8f0; border-radius: 8px; padding: 1rem; margin: 0 0.75rem 0.75rem 0; min-width: 180px; }
.modal { display: none; position: fixed; inset: 0; background: rgba(15,23,42,0.5); align-items: center; justify-content: center; }
.modal .box { background: #fff; border-radius: 8px; padding: 1rem; width: 100%; max-width: 420px; }
.modal input, .modal select, .modal textarea { width: 100%; box-sizing: border-box; margin-bottom: 0.5rem; padding: 0.4rem; }
.legend span.dot { display: inline-block; width: 10px; height: 10px; border-radius: 50%; margin-right: 4px; }
.legend { font-size: 0.8rem; color: #475569; margin: 0.5rem 0; }
.error-page { text-align: center; margin-top: 4rem; }
form.inline { display: inline; }
#calendar { background: #fff; min-height: 70vh; }
#breadcrumbs { margin-top: 0.75rem; font-size: 0.9rem; }
"#;

pub fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Rupiah display: grouped thousands, no decimals.
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

fn shell(title: &str, user: Option<&SessionUser>, head_extra: &str, body: &str) -> Html<String> {
    let nav = match user {
        Some(user) => {
            let admin_link = if user.role.is_admin() {
                r#"<a href="/admin">Panel</a>"#
            } else {
                ""
            };
            format!(
                r#"<nav>
  <span class="brand">Teamdesk</span>
  <a href="/home">Home</a>
  <a href="/calendar">Kalender</a>
  <a href="/cashflow">Buku Kas</a>
  <a href="/notes">Catatan</a>
  {admin_link}
  <span class="who">{username} ({role})</span>
  <details>
    <summary>Ganti Password</summary>
    <form action="/api/change-password" method="post">
      <input type="password" name="old_password" placeholder="Password lama" required>
      <input type="password" name="new_password" placeholder="Password baru" required>
      <button type="submit">Simpan</button>
    </form>
  </details>
  <form action="/logout" method="post"><button type="submit">Logout</button></form>
</nav>"#,
                admin_link = admin_link,
                username = esc(&user.username),
                role = user.role.as_str(),
            )
        }
        None => String::new(),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{style}</style>
{head_extra}
</head>
<body>
{nav}
<main>
{body}
</main>
</body>
</html>"#,
        title = esc(title),
        style = STYLE,
        head_extra = head_extra,
        nav = nav,
        body = body,
    ))
}

pub fn login_page() -> Html<String> {
    shell(
        "Login",
        None,
        "",
        r#"<div class="error-page">
  <h1>Team App</h1>
  <p>Login sistem</p>
  <form action="/login" method="post">
    <p><input type="text" name="username" placeholder="Username" required></p>
    <p><input type="password" name="password" placeholder="Password" required></p>
    <p><button type="submit">Masuk</button></p>
  </form>
</div>"#,
    )
}

pub fn login_failed() -> Html<String> {
    shell(
        "Error",
        None,
        "",
        r#"<div class="error-page">
  <h1 class="out">Login Gagal</h1>
  <p><a href="/">Coba Lagi</a></p>
</div>"#,
    )
}

pub fn home_page(
    user: &SessionUser,
    balance: i64,
    events: &[EventRow],
    notes: &[NoteRow],
) -> Html<String> {
    let mut body = format!(
        r#"<h1>Halo, {}!</h1>
<p>Berikut ringkasan aktivitas tim hari ini.</p>
<div>
  <div class="widget"><div>Saldo Kas</div><strong class="{}">{}</strong><br><a href="/cashflow">Lihat Detail</a></div>
  <div class="widget"><div>Agenda Mendatang</div><strong>{} Event</strong><br><a href="/calendar">Buka Kalender</a></div>
  <div class="widget"><div>Catatan Terbaru</div><strong>{} Update</strong><br><a href="/notes">Kelola Catatan</a></div>
</div>"#,
        esc(&user.username),
        if balance >= 0 { "in" } else { "out" },
        format_rupiah(balance),
        events.len(),
        notes.len(),
    );

    body.push_str("<h2>Segera Datang</h2>");
    if events.is_empty() {
        body.push_str("<p>Tidak ada agenda dekat.</p>");
    } else {
        body.push_str("<ul>");
        for event in events {
            let category = EventCategory::parse(&event.category);
            body.push_str(&format!(
                r#"<li><span class="dot" style="background:{}"></span> <strong>{}</strong> — {}</li>"#,
                category.color(),
                esc(&event.title),
                esc(&event.start_time),
            ));
        }
        body.push_str("</ul>");
    }

    body.push_str("<h2>Catatan Terakhir</h2>");
    if notes.is_empty() {
        body.push_str("<p>Belum ada catatan.</p>");
    } else {
        body.push_str("<ul>");
        for note in notes {
            body.push_str(&format!(
                "<li><strong>{}</strong> — oleh {}</li>",
                esc(&note.title),
                esc(&note.created_by),
            ));
        }
        body.push_str("</ul>");
    }

    shell("Home", Some(user), "", &body)
}

const CALENDAR_CDN: &str =
    r#"<script src="https://cdn.jsdelivr.net/npm/fullcalendar@6.1.10/index.global.min.js"></script>"#;

const CALENDAR_SCRIPT: &str = r#"<script>
let calendar;
const modal = document.getElementById('eventModal');
const form = document.getElementById('eventForm');
const btnDelete = document.getElementById('btnDelete');

function openModal(e) {
  modal.style.display = 'flex';
  if (e) {
    document.getElementById('modalTitle').textContent = 'Edit Event';
    document.getElementById('eventId').value = e.id;
    document.getElementById('eventTitle').value = e.title;
    document.getElementById('eventDescription').value = e.extendedProps.description || '';
    document.getElementById('eventStart').value = e.startStr.slice(0, 16);
    document.getElementById('eventEnd').value = e.endStr ? e.endStr.slice(0, 16) : e.startStr.slice(0, 16);
    document.getElementById('eventCategory').value = e.extendedProps.category;
    btnDelete.style.display = 'inline-block';
    btnDelete.onclick = () => deleteEvent(e.id);
  } else {
    document.getElementById('modalTitle').textContent = 'Event Baru';
    form.reset();
    document.getElementById('eventId').value = '';
    btnDelete.style.display = 'none';
  }
}

function closeModal() { modal.style.display = 'none'; }

async function deleteEvent(id) {
  if (!confirm('Hapus event ini?')) return;
  const res = await fetch('/api/events/' + id, { method: 'DELETE' });
  if (res.ok) { calendar.getEventById(id).remove(); closeModal(); }
  else alert('Gagal menghapus');
}

document.addEventListener('DOMContentLoaded', function () {
  calendar = new FullCalendar.Calendar(document.getElementById('calendar'), {
    initialView: 'dayGridMonth',
    headerToolbar: { left: 'prev,next today', center: 'title', right: 'dayGridMonth,timeGridWeek,listWeek' },
    events: '/api/events',
    height: '100%',
    editable: true,
    dayMaxEvents: true,
    eventClick: i => openModal(i.event),
    eventDrop: async i => fetch('/api/events/' + i.event.id, {
      method: 'PUT',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({
        title: i.event.title,
        description: i.event.extendedProps.description,
        start_time: i.event.start.toISOString(),
        end_time: i.event.end ? i.event.end.toISOString() : i.event.start.toISOString(),
        category: i.event.extendedProps.category
      })
    })
  });
  calendar.render();

  form.addEventListener('submit', async e => {
    e.preventDefault();
    const d = Object.fromEntries(new FormData(e.target));
    if (new Date(d.start) >= new Date(d.end)) { alert('Waktu selesai harus lebih besar dari waktu mulai'); return; }
    const url = d.id ? '/api/events/' + d.id : '/api/events';
    const res = await fetch(url, {
      method: d.id ? 'PUT' : 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ title: d.title, description: d.description, start_time: d.start, end_time: d.end, category: d.category })
    });
    if (res.ok) { calendar.refetchEvents(); closeModal(); }
    else alert('Error menyimpan event');
  });
});
</script>"#;

pub fn calendar_page(user: &SessionUser) -> Html<String> {
    let mut legend = String::from(r#"<div class="legend">"#);
    let mut options = String::new();
    for category in EventCategory::ALL {
        legend.push_str(&format!(
            r#"<span class="dot" style="background:{}"></span>{} &nbsp; "#,
            category.color(),
            category.label(),
        ));
        options.push_str(&format!(
            r#"<option value="{}">{}</option>"#,
            category.as_str(),
            category.label(),
        ));
    }
    legend.push_str("</div>");

    let body = format!(
        r#"<h1>Jadwal Tim</h1>
<p>Kegiatan &amp; Agenda <button onclick="openModal()">+ Tambah Event</button></p>
{legend}
<div id="calendar"></div>
<div id="eventModal" class="modal">
  <div class="box">
    <h2 id="modalTitle">Event</h2>
    <form id="eventForm">
      <input type="hidden" name="id" id="eventId">
      <input type="text" name="title" id="eventTitle" placeholder="Judul Agenda" required>
      <select name="category" id="eventCategory">{options}</select>
      <textarea name="description" id="eventDescription" rows="2" placeholder="Detail tambahan..."></textarea>
      <label>Mulai <input type="datetime-local" name="start" id="eventStart" required></label>
      <label>Selesai <input type="datetime-local" name="end" id="eventEnd" required></label>
      <p>
        <button type="submit">Simpan</button>
        <button type="button" onclick="closeModal()">Batal</button>
        <button type="button" id="btnDelete" class="out">Hapus Event</button>
      </p>
    </form>
  </div>
</div>
{script}"#,
        legend = legend,
        options = options,
        script = CALENDAR_SCRIPT,
    );

    shell("Kalender", Some(user), CALENDAR_CDN, &body)
}

const CASHFLOW_SCRIPT: &str = r#"<script>
async function deleteCash(id) {
  if (!confirm('Hapus transaksi ini?')) return;
  const res = await fetch('/api/cashflow/' + id, { method: 'DELETE' });
  if (res.ok) window.location.reload();
  else alert('Gagal');
}
</script>"#;

pub fn cashflow_page(
    user: &SessionUser,
    filter: CategoryFilter,
    balance: i64,
    rows: &[BalancedEntry],
) -> Html<String> {
    let mut tabs = String::from(r#"<div class="tabs">"#);
    let all_active = if filter == CategoryFilter::All { " class=\"active\"" } else { "" };
    tabs.push_str(&format!(r#"<a href="/cashflow?cat=all"{}>Semua</a>"#, all_active));
    for category in Category::ALL {
        let active = if filter == CategoryFilter::Only(category) {
            " class=\"active\""
        } else {
            ""
        };
        tabs.push_str(&format!(
            r#"<a href="/cashflow?cat={cat}"{active}>{cat}</a>"#,
            cat = category.as_str(),
            active = active,
        ));
    }
    tabs.push_str("</div>");

    let mut body = format!(
        r#"<h1>Buku Kas</h1>
<p>Pemasukan &amp; Pengeluaran — Saldo saat ini: <strong class="{}">{}</strong></p>
{}"#,
        if balance >= 0 { "in" } else { "out" },
        format_rupiah(balance),
        tabs,
    );

    body.push_str(
        r#"<table>
<thead><tr><th>Tanggal</th><th>Keterangan</th><th class="num in">Masuk</th><th class="num out">Keluar</th><th class="num">Saldo</th><th></th></tr></thead>
<tbody>"#,
    );
    if rows.is_empty() {
        body.push_str(r#"<tr><td colspan="6">Belum ada transaksi</td></tr>"#);
    }
    for row in rows {
        let masuk = if row.entry.amount > 0 {
            format_rupiah(row.entry.amount)
        } else {
            "-".into()
        };
        let keluar = if row.entry.amount < 0 {
            format_rupiah(row.entry.amount.abs())
        } else {
            "-".into()
        };
        let action = if user.role.can_write() {
            format!(
                r#"<button onclick="deleteCash({})">Hapus</button>"#,
                row.entry.id
            )
        } else {
            String::new()
        };
        body.push_str(&format!(
            r#"<tr><td>{}</td><td>{}</td><td class="num in">{}</td><td class="num out">{}</td><td class="num"><strong>{}</strong></td><td>{}</td></tr>"#,
            row.entry.transaction_date,
            esc(&row.entry.description),
            masuk,
            keluar,
            format_rupiah(row.balance),
            action,
        ));
    }
    body.push_str("</tbody></table>");

    if user.role.can_write() {
        let mut category_options = String::new();
        for category in Category::ALL {
            category_options.push_str(&format!(
                r#"<option value="{cat}">{cat}</option>"#,
                cat = category.as_str()
            ));
        }
        body.push_str(&format!(
            r#"<h2>Catat Transaksi</h2>
<form action="/api/cashflow" method="post">
  <p><input type="date" name="date" value="{today}" required></p>
  <p>
    <label><input type="radio" name="type" value="IN" checked> Masuk</label>
    <label><input type="radio" name="type" value="OUT"> Keluar</label>
  </p>
  <p><select name="category">{options}</select></p>
  <p><input type="text" name="description" placeholder="Contoh: Beli Snack" required></p>
  <p><input type="number" name="amount" placeholder="0" min="1" required></p>
  <p><button type="submit">Simpan</button></p>
</form>"#,
            today = chrono::Utc::now().date_naive(),
            options = category_options,
        ));
    }

    body.push_str(CASHFLOW_SCRIPT);
    shell("Buku Kas", Some(user), "", &body)
}

const NOTES_SCRIPT: &str = r#"<script>
const KEY = 'teamdesk.notes';
let all = [], cur = null, editing = null, term = '';

function local() { try { return JSON.parse(localStorage.getItem(KEY)) || []; } catch (e) { return []; } }
function store() { try { localStorage.setItem(KEY, JSON.stringify(all)); } catch (e) {} }
function setStatus(t) { document.getElementById('syncStatus').textContent = t; }

async function syncNotes() {
  const cached = local();
  if (cached.length) { all = cached; render(); setStatus('Offline Mode'); }
  try {
    const res = await fetch('/api/notes');
    if (!res.ok) throw new Error('fetch failed');
    all = await res.json();
    store();
    render();
    setStatus('Online');
  } catch (e) { console.log(e); }
}

function searchNotes(v) { term = v.toLowerCase(); render(); }

function openFolder(id) {
  cur = id;
  term = '';
  document.getElementById('searchBox').value = '';
  render();
}

function render() {
  const box = document.getElementById('notesContainer');
  box.innerHTML = '';
  let items;
  if (term.trim() !== '') {
    items = all.filter(n => n.title.toLowerCase().includes(term) || (n.content || '').toLowerCase().includes(term));
    document.getElementById('breadcrumbs').textContent = 'Hasil Pencarian: "' + term + '"';
  } else {
    items = all.filter(n => n.parent_id === cur);
    crumbs();
  }
  items.sort((a, b) => b.is_folder - a.is_folder || a.title.localeCompare(b.title));
  if (!items.length) box.innerHTML = '<p>Tidak ditemukan item.</p>';
  items.forEach(n => {
    const el = document.createElement('div');
    el.className = n.is_folder === 1 ? 'card folder' : 'card';
    el.textContent = n.is_folder === 1 ? n.title + '/' : n.title;
    el.onclick = () => n.is_folder === 1 ? openFolder(n.id) : edit(n);
    box.appendChild(el);
  });
}

function crumbs() {
  const path = [{ id: null, title: 'Home' }];
  let t = cur, safe = 0;
  while (t && safe < 10) {
    const f = all.find(n => n.id === t);
    if (f) { path.splice(1, 0, { id: f.id, title: f.title }); t = f.parent_id; }
    else { t = null; }
    safe++;
  }
  const bc = document.getElementById('breadcrumbs');
  bc.innerHTML = '';
  path.forEach((p, i) => {
    const a = document.createElement('a');
    a.href = '#';
    a.textContent = p.title;
    a.onclick = e => { e.preventDefault(); openFolder(p.id); };
    bc.appendChild(a);
    if (i < path.length - 1) bc.appendChild(document.createTextNode(' > '));
  });
}

function edit(n) {
  editing = n;
  document.getElementById('noteTitle').value = n.title;
  document.getElementById('noteContent').value = n.content || '';
  document.getElementById('editor').style.display = 'block';
}

function newNote() {
  editing = null;
  document.getElementById('noteTitle').value = '';
  document.getElementById('noteContent').value = '';
  document.getElementById('editor').style.display = 'block';
}

function newFolder() {
  const name = prompt('Nama Folder:');
  if (name) save({ title: name, content: '', is_folder: 1 });
}

function saveNote() {
  save({
    title: document.getElementById('noteTitle').value || 'Tanpa Judul',
    content: document.getElementById('noteContent').value,
    is_folder: 0
  });
}

async function save(data) {
  setStatus('Menyimpan...');
  const payload = {
    id: editing ? editing.id : null,
    title: data.title,
    content: data.content,
    is_folder: data.is_folder,
    parent_id: editing ? editing.parent_id : cur
  };
  const url = editing ? '/api/notes/' + editing.id : '/api/notes';
  try {
    const res = await fetch(url, {
      method: editing ? 'PUT' : 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(payload)
    });
    if (res.ok) { closeEditor(); await syncNotes(); }
    else {
      const b = await res.json().catch(() => ({}));
      alert('Gagal menyimpan: ' + (b.error || res.status));
    }
  } catch (e) { alert('Gagal koneksi. Perubahan belum disimpan.'); }
}

async function delNote() {
  if (!editing || !confirm('Hapus item ini?')) return;
  try {
    const res = await fetch('/api/notes/' + editing.id, { method: 'DELETE' });
    if (!res.ok) {
      const b = await res.json().catch(() => ({}));
      alert('Gagal menghapus: ' + (b.error || res.status));
      return;
    }
    closeEditor();
    await syncNotes();
  } catch (e) { alert('Gagal menghapus'); }
}

function closeEditor() {
  document.getElementById('editor').style.display = 'none';
  editing = null;
}

document.addEventListener('DOMContentLoaded', syncNotes);
</script>"#;

pub fn notes_page(user: &SessionUser) -> Html<String> {
    let buttons = if user.role.can_write() {
        r#"<button onclick="newFolder()">+ Folder</button> <button onclick="newNote()">+ Catatan</button>"#
    } else {
        ""
    };
    let body = format!(
        r#"<h1>Catatan &amp; Dokumen</h1>
<p id="syncStatus">Memuat data...</p>
<p><input id="searchBox" type="text" placeholder="Cari catatan..." oninput="searchNotes(this.value)"> {buttons}</p>
<div id="breadcrumbs"></div>
<div id="notesContainer" class="cards"></div>
<div id="editor" class="editor" style="display:none">
  <input id="noteTitle" placeholder="Judul Catatan...">
  <textarea id="noteContent" placeholder="Tulis sesuatu..."></textarea>
  <p>
    <button onclick="saveNote()">Simpan</button>
    <button onclick="closeEditor()">Batal</button>
    <button class="out" onclick="delNote()">Hapus</button>
  </p>
</div>
{script}"#,
        buttons = buttons,
        script = NOTES_SCRIPT,
    );
    shell("Catatan", Some(user), "", &body)
}

const ADMIN_SCRIPT: &str = r#"<script>
async function delUser(id) {
  if (!confirm('Hapus?')) return;
  await fetch('/api/users/' + id, { method: 'DELETE' });
  location.reload();
}
</script>"#;

pub fn admin_page(user: &SessionUser, users: &[UserRow]) -> Html<String> {
    const ROLES: [Role; 4] = [Role::Member, Role::Contributor, Role::ViewOnly, Role::Admin];

    let mut create_options = String::new();
    for role in ROLES {
        create_options.push_str(&format!(
            r#"<option value="{role}">{role}</option>"#,
            role = role.as_str()
        ));
    }

    let mut body = format!(
        r#"<h1>Admin Panel</h1>
<h2>Manajemen User</h2>
<form action="/api/users" method="post">
  <input name="username" placeholder="Username" required>
  <input name="password" type="password" placeholder="Password" required>
  <select name="role">{options}</select>
  <button type="submit">Tambah</button>
</form>
<table>
<thead><tr><th>User</th><th>Role</th><th>Aksi</th></tr></thead>
<tbody>"#,
        options = create_options,
    );

    for row in users {
        let current = Role::parse(&row.role);
        let mut role_options = String::new();
        for role in ROLES {
            let selected = if role == current { " selected" } else { "" };
            role_options.push_str(&format!(
                r#"<option value="{role}"{selected}>{role}</option>"#,
                role = role.as_str(),
                selected = selected,
            ));
        }
        body.push_str(&format!(
            r#"<tr>
<td>{username}</td>
<td>
  <form class="inline" action="/api/users/{id}/role" method="post">
    <select name="role">{role_options}</select>
    <button type="submit">Ubah</button>
  </form>
</td>
<td><button class="out" onclick="delUser('{id}')">Hapus</button></td>
</tr>"#,
            username = esc(&row.username),
            id = esc(&row.id),
            role_options = role_options,
        ));
    }

    body.push_str("</tbody></table>");
    body.push_str(ADMIN_SCRIPT);
    shell("Admin Panel", Some(user), "", &body)
}
