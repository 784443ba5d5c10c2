//! Built-in sample article, imported without any network access.

/// Source token that selects [`DEMO_HTML`].
pub const DEMO_SOURCE: &str = "demo";

/// Title of the sample article.
pub const DEMO_TITLE: &str = "Demo Article: Machine Learning Basics";

pub const DEMO_HTML: &str = r#"<html>
<head>
    <title>Demo Article: Machine Learning Basics</title>
    <style>
        .demo-header { color: #2563eb; border-bottom: 2px solid #2563eb; padding-bottom: 0.5rem; }
        .demo-highlight { background-color: #fef3c7; padding: 0.25rem 0.5rem; border-radius: 4px; }
        .demo-algorithm-list { background: linear-gradient(135deg, #f0f9ff 0%, #e0f2fe 100%); padding: 1rem; border-radius: 8px; border-left: 4px solid #0ea5e9; }
        .demo-quote { font-style: italic; color: #374151; background: #f9fafb; padding: 1rem; border-left: 4px solid #d1d5db; margin: 1rem 0; }
    </style>
</head>
<body>
<article>
    <h1 class="demo-header">Machine Learning Basics</h1>
    <p>Machine learning is a subset of <span class="demo-highlight">artificial intelligence</span> that focuses on algorithms that can learn and make decisions from data.</p>

    <h2 class="demo-header">Types of Machine Learning</h2>
    <p>There are three main types of machine learning:</p>
    <ul>
        <li><strong>Supervised Learning</strong> - Learning with labeled examples</li>
        <li><strong>Unsupervised Learning</strong> - Finding patterns in unlabeled data</li>
        <li><strong>Reinforcement Learning</strong> - Learning through interaction and feedback</li>
    </ul>

    <h2 class="demo-header">Common Algorithms</h2>
    <div class="demo-algorithm-list">
        <p>Some popular machine learning algorithms include:</p>
        <ul>
            <li>Linear Regression</li>
            <li>Decision Trees</li>
            <li>Neural Networks</li>
            <li>Support Vector Machines</li>
        </ul>
    </div>

    <h2 class="demo-header">Applications</h2>
    <p>Machine learning is used in many areas including <span class="demo-highlight">image recognition</span>, natural language processing, recommendation systems, and autonomous vehicles.</p>

    <blockquote class="demo-quote">
        "Machine learning is the science of getting computers to learn without being explicitly programmed." - Arthur Samuel
    </blockquote>
</article>
</body>
</html>"#;
