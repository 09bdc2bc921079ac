//! Demonstrates reacting **immediately** to content-moderation feedback while
//! incrementally streaming a tool-call response from an LLM.
//!
//! The assistant has been prompted with a *tool description* that yields a
//! JSON object describing a generated code snippet. Besides the snippet the
//! object carries a `moderation` field so that the model (or an upstream
//! service) can flag policy violations early:
//!
//! ```text
//! {
//!   "moderation": {
//!     "decision": "allow" | "block",
//!     "reason":   string | null
//!   }
//!   "filename":   string,
//!   "language":   string,
//!   "code":       string,
//! }
//! ```
//!
//! The example streams a *single* JSON document but feeds it to the listener
//! in small, irregular chunks to mirror how `chat.completions`-style APIs
//! deliver partial tokens. Two things happen while the payload arrives:
//!
//! 1. As soon as the `moderation.decision` string prefixes to `"block"` we
//!    abort processing — **before** the full response has even finished.
//! 2. Each new fragment of the `code` string is printed to `stdout` as soon
//!    as it becomes available, so a user interface could render the snippet
//!    character by character.
//!
//! Run with
//!
//! ```bash
//! cargo run -p jsontap --example llm_tool_call
//! ```

#![allow(clippy::needless_raw_string_hashes)]

use std::{cell::RefCell, rc::Rc};

use jsontap::{PathListener, Value, path};

fn main() {
    // A *toy* assistant response streamed in ten tiny chunks. The
    // `moderation` object comes *first* so that backend code can decide early
    // whether to continue or abort before the rest of the payload (including
    // the potentially expensive code snippet) arrives.
    // In real life this would come from the network.
    let simulated_stream: [&str; 10] = [
        // 0 – start of object, moderation key
        r#"{"moderation":{"decision":"al"#,
        // 1 – continue decision
        r#"lo"#,
        // 2 – finish decision & reason
        r#"w","reason":null},"#,
        // 3 – filename key/value
        r#""filename":"example.rs","#,
        // 4 – language key/value
        r#""language":"rust","#,
        // 5 – code key and opening quote
        r#""code":"use jsontap::PathListener;\nfn main() {\n"#,
        // 6 – more code
        r#"    let mut listener = PathListener::new();\n"#,
        // 7
        r#"    listener.write(\"{}\", true).unwrap();\n"#,
        // 8
        r#"    println!(\"Hello from jsontap!\");\n}\n"#,
        // 9 – close code string and object
        r#""}"#,
    ];

    let blocked = Rc::new(RefCell::new(false));
    let printed = Rc::new(RefCell::new(0usize));

    let mut listener = PathListener::new();

    // -------------------------------- moderation -----------------------------
    {
        let blocked = Rc::clone(&blocked);
        listener.on_partial(path!["moderation", "decision"], move |_, value| {
            if let Value::String(decision) = value {
                if decision.starts_with("block") {
                    *blocked.borrow_mut() = true;
                }
            }
        });
    }
    listener.on_complete(path!["moderation", "decision"], |_, value| {
        if let Value::String(decision) = value {
            println!("moderation decision: {decision}");
        }
    });

    // ---------------------------------- code ---------------------------------
    // The partial callback sees the whole prefix accumulated so far; printing
    // only the unseen suffix streams the snippet fragment by fragment.
    {
        let printed = Rc::clone(&printed);
        listener.on_partial(path!["code"], move |_, value| {
            if let Value::String(code) = value {
                let mut printed = printed.borrow_mut();
                print!("{}", &code[*printed..]);
                *printed = code.len();
            }
        });
    }

    let last = simulated_stream.len() - 1;
    for (i, chunk) in simulated_stream.iter().enumerate() {
        listener.write(chunk, i == last).expect("parser error");
        if *blocked.borrow() {
            eprintln!("moderation blocked the content - aborting");
            return;
        }
    }
    println!();
}
