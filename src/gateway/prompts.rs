// SPDX-License-Identifier: MIT
//! Fixed prompt templates. Each embeds the user payload verbatim and pins
//! the shape of the model's reply.

/// Section headers the simulated-execution reply must contain.
pub const EXECUTION_HEADERS: [&str; 3] = ["Output:", "Errors or Warnings:", "Explanation:"];

/// Sectioned-Markdown code analysis.
pub fn debug_analysis(code: &str) -> String {
    format!(
        "You are an expert code debugger and analyzer. Analyze the provided code and format your response in a clear, structured way using Markdown. Include the following sections:

# Code Overview
Provide a brief description of what the code does.

# Issues Found
- List any bugs, errors, or code smells
- Each issue should be on a new line starting with a dash (-)
- Include specific line numbers or sections where issues are found

# Performance Considerations
- List any performance issues or inefficiencies
- Each point should be on a new line starting with a dash (-)
- Include suggestions for optimization

# Best Practices
- List improvements based on modern development standards
- Each point should be on a new line starting with a dash (-)
- Include code examples where relevant

# Security Concerns
- List any security vulnerabilities
- Each point should be on a new line starting with a dash (-)
- Include severity level and potential impact

# Recommendations
Provide specific code improvements with examples in code blocks:

```
// Example of improved code
```

Here is the code to analyze:

{code}"
    )
}

/// Plain conversational reply.
pub fn chat_reply(message: &str) -> String {
    format!(
        "You are a helpful, intelligent assistant. Respond to the following message from a user:

\"{message}\"

Respond in a conversational manner. If the user asks for code, format it properly using Markdown. If the user asks for a list, use Markdown to format it properly. If the user asks for a table, use Markdown to format it properly."
    )
}

/// Three-section fixed-format execution simulation.
pub fn simulated_execution(code: &str, language: &str) -> String {
    format!(
        "Act as a code execution engine. You will be provided with {language} code to execute.
Your response must follow this exact format without any additional text or formatting:

Output:
[Print the actual output from executing the code. If there is no output, write \"No output\"]

Errors or Warnings:
[List any errors or warnings encountered. If none, write \"None\"]

Explanation:
[Write a brief, clear explanation of what the code does or attempted to do]

Here is the code to execute:
{code}

Important rules:
1. Do not include any markdown formatting, code blocks, or special characters
2. Keep the exact section headers: \"Output:\", \"Errors or Warnings:\", and \"Explanation:\"
3. Show the actual output that would appear when running the code
4. If there's an error, explain specifically what caused it
5. Keep explanations clear and concise
6. Do not include any additional sections or text"
    )
}

/// True when every required section header is present in the reply.
pub fn has_execution_sections(reply: &str) -> bool {
    EXECUTION_HEADERS.iter().all(|h| reply.contains(h))
}
