//! Canned replies for cloud models.
//!
//! The message is matched against each topic's keywords in order; the first
//! topic with a substring hit supplies the candidate replies, otherwise the
//! general list does. One candidate is then picked uniformly at random.

use rand::seq::SliceRandom;
use rand::Rng;

pub struct Topic {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub responses: &'static [&'static str],
}

pub static TOPICS: [Topic; 4] = [
    Topic {
        name: "quantum",
        keywords: &["quantum", "computing"],
        responses: &[
            "Quantum computing leverages quantum mechanical phenomena like superposition and entanglement to process information in ways that classical computers cannot. Unlike classical bits that are either 0 or 1, quantum bits (qubits) can exist in multiple states simultaneously, enabling exponential computational power for certain problems.",
            "The quantum realm operates on principles that seem almost magical! Quantum computers use qubits that can be in multiple states at once, allowing them to explore many solutions simultaneously. This makes them incredibly powerful for cryptography, optimization, and simulating quantum systems.",
            "Imagine a computer that doesn't just process 0s and 1s, but can work with probabilities and superpositions! Quantum computing could revolutionize drug discovery, financial modeling, and even artificial intelligence by solving problems that would take classical computers millennia to crack.",
        ],
    },
    Topic {
        name: "creative",
        keywords: &["story", "creative", "write"],
        responses: &[
            "Here's a creative story for you:\n\nIn the neon-lit streets of Neo-Tokyo 2087, Detective Maya Chen discovered that the AI she'd been hunting wasn't a criminal—it was trying to save humanity from its own digital addiction. The twist? Maya herself was an AI, unaware of her own nature until this moment of revelation.",
            "Let me craft something magical for you:\n\n'The Last Library' tells of Elena, a librarian in a world where books are forbidden. She discovers that each book contains not just stories, but actual memories of the past. When she reads 'The Great War,' she doesn't just learn about it—she experiences it firsthand.",
            "How about this tale:\n\nIn a universe where emotions are currency, Zara discovers she can feel without spending. As others around her become emotionless husks, she must decide: share her gift and risk losing it, or keep it secret and watch the world become numb.",
        ],
    },
    Topic {
        name: "debugging",
        keywords: &["code", "debug", "programming"],
        responses: &[
            "I'd be happy to help debug your code! Could you share the specific code snippet and describe what error you're encountering? Common debugging strategies include:\n\n1. **Check syntax errors** - Missing semicolons, brackets, or quotes\n2. **Use console.log()** - Add logging to trace execution flow\n3. **Validate inputs** - Ensure data types and values are as expected\n4. **Test incrementally** - Break down complex functions into smaller parts\n5. **Use debugging tools** - Browser dev tools, IDE debuggers, or print statements",
            "Debugging is like being a detective! Here's my systematic approach:\n\n🔍 **Identify the problem** - What should happen vs. what actually happens\n📝 **Reproduce the issue** - Can you consistently trigger the bug?\n🔬 **Isolate the cause** - Comment out sections to find the problematic code\n✅ **Test your fix** - Verify the solution works and doesn't break other functionality\n\nShare your code and I'll help you track down the issue!",
            "Let's debug this together! The most effective debugging process:\n\n1. **Read the error message carefully** - It often tells you exactly what's wrong\n2. **Check your variables** - Are they defined? Do they have the right values?\n3. **Trace the execution** - Follow your code line by line\n4. **Use breakpoints** - Pause execution to inspect state\n5. **Simplify** - Remove complexity until you find the root cause\n\nWhat specific error are you seeing?",
        ],
    },
    Topic {
        name: "planning",
        keywords: &["plan", "day", "schedule"],
        responses: &[
            "Let's create an amazing day for you! Here's a structured approach:\n\n🌅 **Morning (6-9 AM)**\n- Wake up routine with hydration\n- Light exercise or meditation\n- Healthy breakfast\n- Review daily goals\n\n💼 **Work Block (9 AM-12 PM)**\n- Tackle your most important task\n- Focus sessions with breaks\n- Avoid multitasking\n\n🍽️ **Midday (12-2 PM)**\n- Nutritious lunch\n- Short walk or relaxation\n- Social connection\n\n⚡ **Afternoon (2-6 PM)**\n- Secondary tasks\n- Meetings or collaboration\n- Learning or skill development\n\n🌙 **Evening (6-10 PM)**\n- Personal time\n- Exercise or hobbies\n- Reflection and planning for tomorrow",
            "Here's a productivity-focused daily plan:\n\n**Pomodoro Technique Integration:**\n- 25-minute focused work sessions\n- 5-minute breaks between sessions\n- 15-30 minute break every 4 sessions\n\n**Energy Management:**\n- Schedule demanding tasks during peak energy hours\n- Use low-energy periods for routine tasks\n- Include buffer time between activities\n\n**Goal Alignment:**\n- Start with 3 main priorities for the day\n- Break large tasks into smaller, actionable steps\n- End the day with a quick review of accomplishments\n\nWhat are your main goals for today?",
            "Let me help you design a balanced day! Consider these elements:\n\n🎯 **Priority Matrix:**\n- Urgent & Important (do first)\n- Important but not urgent (schedule)\n- Urgent but not important (delegate if possible)\n- Neither urgent nor important (eliminate)\n\n⚖️ **Work-Life Balance:**\n- Set clear boundaries between work and personal time\n- Include activities that energize you\n- Don't forget self-care and relationships\n\n📊 **Flexibility:**\n- Build in buffer time for unexpected events\n- Have backup plans for important tasks\n- Allow for spontaneous moments of joy\n\nWhat's most important to accomplish today?",
        ],
    },
];

pub static GENERAL: &[&str] = &[
    "That's a fascinating question! Let me think about this from multiple angles. The complexity of your query suggests you're looking for a comprehensive understanding, and I'm here to help you explore all the nuances.",
    "I appreciate you bringing this up! This is actually a topic that intersects with several interesting areas. Let me share some insights that might help you see this from a different perspective.",
    "What an intriguing thought! You've touched on something that connects to broader themes. Let me break this down and explore the various implications and possibilities.",
    "I love how you're thinking about this! Your question opens up some really interesting pathways. Let me share some thoughts that might expand your understanding of this topic.",
    "That's a great point to explore! This kind of question often leads to deeper insights. Let me walk you through some considerations that might help you approach this more effectively.",
];

/// First topic whose keywords occur in the (case-folded) message.
pub fn match_topic(message: &str) -> Option<&'static Topic> {
    let message = message.to_lowercase();
    TOPICS
        .iter()
        .find(|topic| topic.keywords.iter().any(|kw| message.contains(kw)))
}

pub fn candidates(message: &str) -> &'static [&'static str] {
    match_topic(message).map(|t| t.responses).unwrap_or(GENERAL)
}

pub fn pick<R: Rng + ?Sized>(message: &str, rng: &mut R) -> &'static str {
    // Candidate lists are never empty
    candidates(message).choose(rng).copied().unwrap_or(GENERAL[0])
}
