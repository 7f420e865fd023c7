//! Page templates. Handlebars escapes every `{{value}}` so message
//! content, which is untrusted model output, is always rendered as
//! text. Triple braces are never used.

use std::fmt;

use handlebars::{Handlebars, handlebars_helper};

use super::format::{capitalize, pretty_print_json};

handlebars_helper!(capitalize_helper: |v: str| capitalize(v));
handlebars_helper!(pretty_json: |v: str| pretty_print_json(v));
handlebars_helper!(inc: |v: u64| format!("{}", v + 1));

#[derive(Debug)]
pub enum Page {
    Layout,
    Message,
    SessionList,
    Session,
    Error,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{title}} · LLM Logger</title>
  <link rel="stylesheet" href="{{base_url}}/viewer.css">
</head>
<body>
  <header class="site-header">
    <a href="{{base_url}}/" class="site-title">LLM Logger</a>
  </header>
  <main>
"#;

const MESSAGE: &str = r#"<li data-role="{{role}}" class="{{class}}">
  <div class="role-label">{{capitalize role}}</div>
  <div class="message-body">
    {{#if tool_calls}}
      {{#each tool_calls}}
      <div class="tool-call">
        <strong>Tool:</strong> {{name}}
        <pre>{{arguments}}</pre>
      </div>
      {{/each}}
    {{else}}
      {{#if tool_response}}
      <div class="tool-response">
        <div class="tool-call-label">Tool Response:</div>
        <pre class="tool-response-body">{{pretty_json tool_response}}</pre>
      </div>
      {{else}}
      {{text}}
      {{/if}}
    {{/if}}
  </div>
</li>
"#;

const SESSION_LIST: &str = r#"{{> Layout}}
<section class="session-list-page">
  <form class="search-container" method="get" action="{{base_url}}/">
    <input type="date" name="date" value="{{date}}" class="date-input">
    <input type="text" name="q" value="{{search}}" placeholder="Search sessions..." class="search-input">
    <button type="submit">Search</button>
    <a href="{{base_url}}/?date=all" class="all-link">All dates</a>
  </form>
  {{#if groups}}
  <div id="sessions-list">
    {{#each groups}}
    <div class="date-group">
      <h2 class="date-header">{{date}}</h2>
      <ul class="session-list">
        {{#each sessions}}
        <li class="session-item">
          <a href="{{href}}" class="session-link">
            <div class="session-content">
              <div class="sender-name">{{sender}}</div>
              {{#if message}}
              <div class="message-text">{{message}}</div>
              {{else}}
              <div class="empty-message">No message content</div>
              {{/if}}
              <div class="session-footer">
                <span class="session-id-small">{{short_id}}...</span>
                <span class="session-time-small">{{display_time}}</span>
              </div>
            </div>
          </a>
        </li>
        {{/each}}
      </ul>
    </div>
    {{/each}}
  </div>
  {{else}}
  <div class="empty-state">
    <p>No sessions found.</p>
    <p>Start using LLM Logger in your application to see sessions here.</p>
  </div>
  {{/if}}
</section>
</main>
</body>
</html>
"#;

const SESSION: &str = r#"{{> Layout}}
<section class="session-page">
  <nav class="entry-nav">
    <a href="{{base_url}}/" id="back-btn">Back</a>
    {{#if has_prev}}<a href="{{base_url}}/sessions/{{session_href}}?entry={{prev_index}}" id="prev-btn">Previous</a>{{else}}<span class="disabled" id="prev-btn">Previous</span>{{/if}}
    <span id="entry-position">Entry {{inc entry.index}} of {{total}}</span>
    {{#if has_next}}<a href="{{base_url}}/sessions/{{session_href}}?entry={{next_index}}" id="next-btn">Next</a>{{else}}<span class="disabled" id="next-btn">Next</span>{{/if}}
    <a href="{{base_url}}/sessions/{{session_href}}?entry={{entry.index}}" id="refresh-btn">Refresh</a>
  </nav>
  <div id="entry-container">
    <div><strong>Time:</strong> {{entry.time}}</div>
    <div><strong>Model:</strong> {{entry.model}} ({{entry.provider}})</div>
    <div><strong>Latency:</strong> {{entry.latency}}</div>
    <div><strong>Token Usage:</strong> {{entry.tokens_total}} {{#if entry.tokens_split}}{{entry.tokens_split}}{{/if}}</div>
    <details class="context-section">
      <summary class="toggle-context">Context Messages ({{entry.context_count}})</summary>
      <ul class="context-list">
        {{#each entry.context_messages}}{{> Message}}{{/each}}
      </ul>
    </details>
    <div><strong>New Messages:</strong></div>
    {{#if entry.new_messages}}
    <ul class="new-list">
      {{#each entry.new_messages}}{{> Message}}{{/each}}
    </ul>
    {{else}}
    <p class="empty-message">No new messages in this turn.</p>
    {{/if}}
  </div>
</section>
</main>
</body>
</html>
"#;

const ERROR: &str = r#"{{> Layout}}
<section class="error-state">
  <p>⚠️ {{message}}</p>
  <p><a href="{{base_url}}/">Back to sessions</a></p>
</section>
</main>
</body>
</html>
"#;

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_helper("capitalize", Box::new(capitalize_helper));
    registry.register_helper("pretty_json", Box::new(pretty_json));
    registry.register_helper("inc", Box::new(inc));
    for (page, source) in [
        (Page::Layout, LAYOUT),
        (Page::Message, MESSAGE),
        (Page::SessionList, SESSION_LIST),
        (Page::Session, SESSION),
        (Page::Error, ERROR),
    ] {
        registry
            .register_template_string(&page.to_string(), source)
            .expect("Failed to register template");
    }
    registry
}
