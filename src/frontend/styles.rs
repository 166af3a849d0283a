use leptos::*;

// CSS-in-Rust: Catppuccin Latte for light, Mocha for dark, keyed off the
// document's data-theme attribute.
const MAIN_STYLES: &str = r#"
@import url("https://fonts.googleapis.com/css2?family=DM+Mono:ital,wght@0,300;0,400;0,500&display=swap");

:root {
    --base: #eff1f5;
    --surface: #ccd0da;
    --overlay: #9ca0b0;
    --text: #4c4f69;
    --subtext: #5c5f77;
    --accent: #1e66f5;
    --success: #40a02b;
    --error: #d20f39;
    --warning: #df8e1d;
    --info: #1e66f5;
}

[data-theme="dark"] {
    --base: #1e1e2e;
    --surface: #45475a;
    --overlay: #6c7086;
    --text: #cdd6f4;
    --subtext: #bac2de;
    --accent: #89b4fa;
    --success: #a6e3a1;
    --error: #f38ba8;
    --warning: #f9e2af;
    --info: #89b4fa;
}

body {
    font-family: "DM Mono", monospace;
    letter-spacing: -0.05ch;
    background-color: var(--base);
    color: var(--text);
    margin: 0;
    padding: 20px;
    transition: background-color 0.2s ease-out, color 0.2s ease-out;
}

.app {
    max-width: 1100px;
    margin: 0 auto;
}

.app-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    gap: 20px;
    margin-bottom: 20px;
}

.app-header h1 {
    margin: 0;
    font-size: 2rem;
    font-weight: 500;
}

.app-header nav a {
    color: var(--subtext);
    margin-right: 15px;
    text-decoration: none;
}

.app-header nav a[aria-current="page"] {
    color: var(--accent);
}

.border-container {
    position: relative;
    padding: 20px;
    border: 2px solid var(--surface);
    transition: border-color 0.2s ease-out;
    background-color: var(--base);
}

.stats-bar {
    display: flex;
    gap: 20px;
    color: var(--subtext);
}

.theme-toggle {
    background: none;
    border: 2px solid var(--surface);
    color: var(--text);
    padding: 8px 12px;
    cursor: pointer;
}

.drop-area {
    border: 2px dashed var(--overlay);
    padding: 40px 20px;
    text-align: center;
    cursor: pointer;
    transition: border-color 0.2s ease-out, background-color 0.2s ease-out;
}

.drop-area i {
    font-size: 2.5rem;
    color: var(--overlay);
}

.drop-area .hint {
    color: var(--overlay);
    font-size: 12px;
}

.drop-area.dragover {
    border-color: var(--success);
    background-color: var(--surface);
}

.file-info {
    margin: 15px 0;
    color: var(--subtext);
}

.file-info .fa-check-circle {
    color: var(--success);
}

.image-preview img {
    max-width: 100%;
    max-height: 200px;
    object-fit: contain;
}

.upload-progress {
    margin: 15px 0;
}

.progress-bar {
    width: 100%;
    background-color: var(--surface);
    height: 8px;
}

.progress-fill {
    height: 100%;
    width: 0;
    background-color: var(--accent);
    transition: width 0.2s ease;
}

.progress-text {
    margin-top: 6px;
    font-size: 12px;
    color: var(--subtext);
}

.btn-upload, .action-btn {
    background-color: var(--base);
    border: 2px solid var(--surface);
    color: var(--text);
    padding: 10px 16px;
    cursor: pointer;
    font-family: "DM Mono", monospace;
    font-size: 14px;
    text-decoration: none;
    display: inline-block;
    margin: 2px;
}

.btn-upload:hover:not(:disabled), .action-btn:hover {
    border-color: var(--accent);
}

.btn-upload:disabled {
    color: var(--overlay);
    cursor: not-allowed;
}

.delete-btn:hover {
    border-color: var(--error);
}

.search-input {
    background-color: var(--base);
    border: 2px solid var(--surface);
    color: var(--text);
    padding: 10px 15px;
    font-family: "DM Mono", monospace;
    font-size: 16px;
    width: 100%;
    box-sizing: border-box;
}

.search-input:focus {
    outline: none;
    border-color: var(--warning);
}

.files-table {
    width: 100%;
    border-collapse: collapse;
    margin-top: 15px;
}

.files-table th, .files-table td {
    text-align: left;
    padding: 10px 8px;
    border-bottom: 1px solid var(--surface);
}

.no-results, .loading {
    text-align: center;
    padding: 30px 20px;
    color: var(--subtext);
}

.flash-messages {
    position: fixed;
    top: 20px;
    right: 20px;
    display: flex;
    flex-direction: column;
    gap: 10px;
    z-index: 1000;
}

.flash {
    display: flex;
    align-items: center;
    gap: 10px;
    min-width: 260px;
    padding: 12px 16px;
    background-color: var(--base);
    border: 2px solid var(--info);
    cursor: pointer;
    transition: opacity 0.5s ease, transform 0.5s ease;
}

.flash.success { border-color: var(--success); }
.flash.error { border-color: var(--error); }
.flash.warning { border-color: var(--warning); }

.flash.fading {
    opacity: 0;
    transform: translateX(100%);
}

.preview-overlay {
    position: fixed;
    inset: 0;
    background-color: rgba(0, 0, 0, 0.6);
    display: flex;
    align-items: center;
    justify-content: center;
    z-index: 900;
}

.preview-panel {
    background-color: var(--base);
    border: 2px solid var(--surface);
    width: min(90vw, 900px);
    max-height: 90vh;
    display: flex;
    flex-direction: column;
}

.preview-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 10px 15px;
}

.preview-panel img {
    max-width: 100%;
    max-height: 75vh;
    object-fit: contain;
}

.preview-panel iframe {
    width: 100%;
    height: 75vh;
    border: none;
}

@media (max-width: 768px) {
    .app-header {
        flex-direction: column;
        align-items: flex-start;
    }

    .files-table th:nth-child(3), .files-table td:nth-child(3) {
        display: none;
    }
}
"#;

// CSS-in-Rust: Component that injects styles
#[component]
pub fn StyleProvider() -> impl IntoView {
    view! {
        <style>{MAIN_STYLES}</style>
    }
}
