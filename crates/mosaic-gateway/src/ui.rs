//! The static pick-and-run page.
//!
//! One self-contained HTML document; the page talks to `/api/*` and owns
//! its own poll timer per submitted run.

use axum::response::Html;

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Mosaic Bridge</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 640px; margin: 2rem auto; padding: 0 1rem; color: #1a1a2e; }
  h1 { font-size: 1.4rem; }
  fieldset { border: 1px solid #ccd; border-radius: 6px; margin-bottom: 1rem; }
  legend { font-weight: 600; }
  label { display: block; margin: 0.5rem 0 0.2rem; }
  input[type=text], textarea, select { width: 100%; box-sizing: border-box; padding: 0.4rem; }
  button { margin-top: 0.6rem; padding: 0.4rem 1rem; cursor: pointer; }
  button:disabled { cursor: wait; opacity: 0.6; }
  #status { white-space: pre-line; }
  .ok { color: #186918; }
  .err { color: #a42525; }
  ul#outputs a { word-break: break-all; }
</style>
</head>
<body>
<h1>Mosaic Bridge</h1>

<fieldset>
  <legend>1. Pick a video</legend>
  <label for="file">Local file</label>
  <input type="file" id="file" accept="video/*">
  <label for="url">&hellip;or a URL</label>
  <input type="text" id="url" placeholder="https://example.com/clip.mp4">
  <button id="upload">Upload</button>
  <div id="upload-status"></div>
</fieldset>

<fieldset>
  <legend>2. Pick an agent</legend>
  <label for="agent">Existing agent</label>
  <select id="agent"><option value="">(none)</option></select>
  <label for="prompt">&hellip;or describe one</label>
  <textarea id="prompt" rows="2" placeholder="Remove silences and add captions"></textarea>
  <button id="run" disabled>Run</button>
</fieldset>

<fieldset>
  <legend>3. Result</legend>
  <div id="status">No run yet.</div>
  <ul id="outputs"></ul>
</fieldset>

<script>
"use strict";

const el = (id) => document.getElementById(id);
let fileId = null;
let pollTimer = null;

async function api(path, options) {
  const response = await fetch(path, options);
  const body = await response.json().catch(() => ({}));
  if (!response.ok) {
    throw new Error(body.detail || response.statusText);
  }
  return body;
}

async function loadAgents() {
  try {
    const agents = await api("/api/agents");
    for (const agent of agents) {
      const option = document.createElement("option");
      option.value = agent.name;
      option.textContent = agent.name + " - " + agent.description;
      el("agent").appendChild(option);
    }
  } catch (e) {
    el("status").textContent = "Failed to load agents: " + e.message;
  }
}

async function upload() {
  const note = el("upload-status");
  el("upload").disabled = true;
  note.className = "";
  note.textContent = "Uploading…";
  try {
    let body;
    const file = el("file").files[0];
    if (file) {
      const form = new FormData();
      form.append("file", file);
      body = await api("/api/uploads", { method: "POST", body: form });
    } else if (el("url").value.trim()) {
      body = await api("/api/uploads/url", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ url: el("url").value.trim() }),
      });
    } else {
      throw new Error("Pick a file or paste a URL first");
    }
    fileId = body.file_id;
    note.className = "ok";
    note.textContent = "Uploaded. File id: " + fileId;
    el("run").disabled = false;
  } catch (e) {
    note.className = "err";
    note.textContent = e.message;
  } finally {
    el("upload").disabled = false;
  }
}

async function startRun() {
  el("run").disabled = true;
  el("outputs").innerHTML = "";
  try {
    const body = await api("/api/runs", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify({
        file_id: fileId,
        agent: el("agent").value || null,
        prompt: el("prompt").value || null,
      }),
    });
    el("status").textContent = "Run " + body.run_id + " started…";
    poll(body.run_id);
  } catch (e) {
    el("status").textContent = e.message;
    el("run").disabled = false;
  }
}

function poll(runId) {
  if (pollTimer) clearInterval(pollTimer);
  pollTimer = setInterval(async () => {
    try {
      const snapshot = await api("/api/runs/" + runId);
      const progress = snapshot.progress == null ? "" : " (" + snapshot.progress + "%)";
      el("status").textContent = "Status: " + snapshot.status + progress
        + (snapshot.status_message ? "\n" + snapshot.status_message : "");
      if (snapshot.status === "success" || snapshot.status === "failed") {
        clearInterval(pollTimer);
        pollTimer = null;
        el("run").disabled = false;
        if (snapshot.status === "success") await showOutputs(runId);
      }
    } catch (e) {
      clearInterval(pollTimer);
      pollTimer = null;
      el("run").disabled = false;
      el("status").textContent = "Poll failed: " + e.message;
    }
  }, 5000);
}

async function showOutputs(runId) {
  const body = await api("/api/runs/" + runId + "/outputs");
  for (const url of body.outputs) {
    const item = document.createElement("li");
    const link = document.createElement("a");
    link.href = url;
    link.textContent = url;
    item.appendChild(link);
    el("outputs").appendChild(item);
  }
}

el("upload").addEventListener("click", upload);
el("run").addEventListener("click", startRun);
loadAgents();
</script>
</body>
</html>
"##;
