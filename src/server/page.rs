//! The single-page UI.

use axum::response::{Html, IntoResponse};

/// GET /
///
/// API key entry, video loading, chat and transcript download.
pub async fn index_page() -> impl IntoResponse {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>YouTube Video Q&amp;A</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
            display: flex;
            min-height: 100vh;
        }
        aside {
            width: 300px;
            background-color: #2a2a2a;
            border-right: 1px solid #3a3a3a;
            padding: 20px;
        }
        main {
            flex: 1;
            display: flex;
            flex-direction: column;
            padding: 20px;
            max-width: 900px;
        }
        h1 { font-size: 22px; margin-bottom: 16px; }
        h2 { font-size: 16px; margin-bottom: 8px; color: #aaa; }
        label { display: block; font-size: 13px; color: #888; margin-bottom: 4px; }
        input {
            width: 100%;
            padding: 8px 10px;
            background-color: #1a1a1a;
            border: 1px solid #444;
            border-radius: 4px;
            color: #e0e0e0;
            margin-bottom: 12px;
        }
        button {
            padding: 8px 16px;
            background-color: #4a9eff;
            color: white;
            border: none;
            border-radius: 4px;
            cursor: pointer;
        }
        button:disabled { background-color: #555; cursor: wait; }
        a.download { display: inline-block; margin-top: 16px; color: #4a9eff; }
        a.download.hidden { display: none; }
        #video-info { margin-top: 12px; font-size: 13px; color: #aaa; }
        #chat { flex: 1; overflow-y: auto; margin-bottom: 16px; }
        .message {
            padding: 10px 14px;
            border-radius: 6px;
            margin-bottom: 10px;
            white-space: pre-wrap;
        }
        .message.user { background-color: #2f3b4d; }
        .message.assistant { background-color: #2a2a2a; border: 1px solid #3a3a3a; }
        .message.notice { color: #f0c674; border: 1px dashed #6b5a2e; }
        .error {
            background-color: #4a1f1f;
            border: 1px solid #8b3a3a;
            color: #ffb3b3;
            padding: 10px 14px;
            border-radius: 6px;
            margin-bottom: 12px;
        }
        .error.hidden { display: none; }
        form.ask { display: flex; gap: 8px; }
        form.ask input { margin-bottom: 0; }
    </style>
</head>
<body>
    <aside>
        <h1>YouTube Q&amp;A</h1>
        <label for="api-key">OpenAI API key</label>
        <input id="api-key" type="password" autocomplete="off" placeholder="sk-...">

        <label for="video-url">YouTube URL</label>
        <input id="video-url" type="text" placeholder="https://www.youtube.com/watch?v=...">
        <button id="load-video">Load video</button>

        <div id="video-info"></div>
        <a id="download" class="download hidden" href="#">Download conversation</a>
    </aside>
    <main>
        <div id="error" class="error hidden"></div>
        <div id="chat"></div>
        <form class="ask" id="ask-form">
            <input id="question" type="text" placeholder="Ask a question about the video">
            <button type="submit" id="ask">Ask</button>
        </form>
    </main>
    <script>
        let sessionId = null;
        let sessionKey = null;

        const el = (id) => document.getElementById(id);

        function showError(message) {
            const box = el('error');
            box.textContent = message;
            box.classList.remove('hidden');
        }

        function clearError() {
            el('error').classList.add('hidden');
        }

        function addMessage(kind, text) {
            const div = document.createElement('div');
            div.className = 'message ' + kind;
            div.textContent = text;
            el('chat').appendChild(div);
            el('chat').scrollTop = el('chat').scrollHeight;
        }

        async function api(method, path, body) {
            const response = await fetch(path, {
                method,
                headers: body ? { 'Content-Type': 'application/json' } : {},
                body: body ? JSON.stringify(body) : undefined,
            });
            if (response.status === 204) {
                return null;
            }
            const data = await response.json().catch(() => ({ error: response.statusText }));
            if (!response.ok) {
                throw new Error(data.error || 'Request failed');
            }
            return data;
        }

        async function ensureSession() {
            const key = el('api-key').value.trim();
            if (!key) {
                throw new Error('Please enter your OpenAI API key.');
            }
            if (sessionId && key === sessionKey) {
                return sessionId;
            }
            if (sessionId) {
                await api('DELETE', '/api/sessions/' + sessionId).catch(() => {});
                el('chat').innerHTML = '';
                el('video-info').textContent = '';
            }
            const created = await api('POST', '/api/sessions', { api_key: key });
            sessionId = created.session_id;
            sessionKey = key;
            const link = el('download');
            link.href = '/api/sessions/' + sessionId + '/transcript';
            link.classList.remove('hidden');
            return sessionId;
        }

        async function withBusy(button, action) {
            clearError();
            button.disabled = true;
            try {
                await action();
            } catch (err) {
                showError(err.message);
            } finally {
                button.disabled = false;
            }
        }

        el('load-video').addEventListener('click', () => withBusy(el('load-video'), async () => {
            const url = el('video-url').value.trim();
            if (!url) {
                throw new Error('Please enter a YouTube URL.');
            }
            const id = await ensureSession();
            const previousInfo = el('video-info').textContent;
            el('video-info').textContent = 'Loading transcript...';
            try {
                const video = await api('POST', '/api/sessions/' + id + '/video', { url });
                const minutes = Math.round(video.duration_seconds / 60);
                el('video-info').textContent =
                    video.title + ' (' + minutes + ' min, ' + video.chunks_indexed + ' chunks indexed)';
                addMessage('user', 'Summarize this video');
                addMessage('assistant', video.summary);
            } catch (err) {
                el('video-info').textContent = previousInfo;
                throw err;
            }
        }));

        el('ask-form').addEventListener('submit', (event) => {
            event.preventDefault();
            withBusy(el('ask'), async () => {
                const question = el('question').value.trim();
                if (!question) {
                    return;
                }
                const id = await ensureSession();
                const reply = await api('POST', '/api/sessions/' + id + '/questions', { question });
                if (reply.answered) {
                    addMessage('user', question);
                    addMessage('assistant', reply.answer);
                    el('question').value = '';
                } else {
                    addMessage('notice', reply.answer);
                }
            });
        });

        window.addEventListener('beforeunload', () => {
            if (sessionId) {
                fetch('/api/sessions/' + sessionId, {
                    method: 'DELETE',
                    keepalive: true,
                });
            }
        });
    </script>
</body>
</html>
"##;
