//! The `formmaker init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create formmaker.toml
    if std::path::Path::new("formmaker.toml").exists() {
        println!("formmaker.toml already exists, skipping.");
    } else {
        std::fs::write("formmaker.toml", SAMPLE_CONFIG)?;
        println!("Created formmaker.toml");
    }

    // Create sample form
    std::fs::create_dir_all("forms")?;
    let form_path = std::path::Path::new("forms/sample.json");
    if form_path.exists() {
        println!("forms/sample.json already exists, skipping.");
    } else {
        std::fs::write(form_path, SAMPLE_FORM)?;
        println!("Created forms/sample.json");
    }

    // Create sample answers
    std::fs::create_dir_all("answers")?;
    let answers_path = std::path::Path::new("answers/sample.json");
    if answers_path.exists() {
        println!("answers/sample.json already exists, skipping.");
    } else {
        std::fs::write(answers_path, SAMPLE_ANSWERS)?;
        println!("Created answers/sample.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: formmaker validate --form forms/sample.json");
    println!("  2. Run: formmaker grade --form forms/sample.json --answers answers/sample.json");
    println!("  3. Edit forms/sample.json to build your own form");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# formmaker configuration

# Fraction of the max score required to pass.
pass_threshold = 0.6

# Where graded submission artifacts are written.
output_dir = "./formmaker-results"
"#;

const SAMPLE_FORM: &str = r#"{
  "title": "Sample Quiz",
  "description": "One question of each type",
  "questions": [
    {
      "type": "categorize",
      "title": "Sort the animals",
      "points": 4,
      "categories": ["Mammal", "Bird"],
      "items": [
        { "text": "Dog", "category": "Mammal", "order": 0 },
        { "text": "Eagle", "category": "Bird", "order": 1 },
        { "text": "Whale", "category": "Mammal", "order": 2 },
        { "text": "Sparrow", "category": "Bird", "order": 3 }
      ]
    },
    {
      "type": "cloze",
      "title": "Fill in the blanks",
      "points": 2,
      "sentence": "The quick brown fox jumps over the lazy dog",
      "blanks": ["fox", "dog"],
      "options": [
        { "text": "fox", "order": 0 },
        { "text": "dog", "order": 1 },
        { "text": "cat", "order": 2 }
      ]
    },
    {
      "type": "comprehension",
      "title": "Reading check",
      "points": 2,
      "passage": "Rust is a systems programming language focused on safety and speed.",
      "subQuestions": [
        {
          "questionType": "mcq",
          "question": "What is Rust focused on?",
          "options": ["safety and speed", "garbage collection", "dynamic typing"],
          "correctAnswer": "safety and speed"
        },
        {
          "questionType": "short",
          "question": "Name one thing you would build with it."
        }
      ]
    }
  ]
}
"#;

const SAMPLE_ANSWERS: &str = r#"{
  "0": {
    "items": [
      { "text": "Dog", "category": "Mammal", "originalCategory": "Mammal" },
      { "text": "Eagle", "category": "Bird", "originalCategory": "Bird" },
      { "text": "Whale", "category": "Bird", "originalCategory": "Mammal" },
      { "text": "Sparrow", "category": "Bird", "originalCategory": "Bird" }
    ]
  },
  "1": {
    "blanks": ["Fox", "dog"]
  },
  "2": {
    "subAnswers": ["safety and speed", "a web server"]
  }
}
"#;
