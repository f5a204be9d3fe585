//! Stop-word lists used by keyword extraction and lexical similarity.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Common English function words.
const ENGLISH: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "bottom", "but", "by", "ca", "call", "can", "cannot", "could", "did", "do",
    "does", "doing", "done", "down", "due", "during", "each", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "first", "five", "for", "former",
    "formerly", "forty", "four", "from", "front", "full", "further", "get", "give", "go", "had",
    "has", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon",
    "hers", "herself", "him", "himself", "his", "how", "however", "hundred", "i", "if", "in",
    "indeed", "into", "is", "it", "its", "itself", "just", "keep", "last", "latter", "latterly",
    "least", "less", "made", "make", "many", "may", "me", "meanwhile", "might", "mine", "more",
    "moreover", "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely",
    "neither", "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor",
    "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "quite", "rather", "re", "really", "regarding",
    "same", "say", "see", "seem", "seemed", "seeming", "seems", "serious", "several", "she",
    "should", "show", "side", "since", "six", "sixty", "so", "some", "somehow", "someone",
    "something", "sometime", "sometimes", "somewhere", "still", "such", "take", "ten", "than",
    "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
    "thereby", "therefore", "therein", "thereupon", "these", "they", "third", "this", "those",
    "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too", "top",
    "toward", "towards", "twelve", "twenty", "two", "under", "unless", "until", "up", "upon",
    "us", "used", "using", "various", "very", "via", "was", "we", "well", "were", "what",
    "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas", "whereby",
    "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who", "whoever",
    "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet", "you",
    "your", "yours", "yourself", "yourselves",
];

/// Words that appear in almost every job posting and say nothing about the
/// skills being asked for.
const JOB_POSTING: &[&str] = &[
    "ability", "able", "applicant", "applicants", "apply", "candidate", "candidates", "company",
    "developer", "developers", "engineer", "engineers", "excellent", "experience", "experienced",
    "familiarity", "good", "great", "ideal", "join", "knowledge", "looking", "opportunity",
    "plus", "position", "preferred", "required", "requirement", "requirements", "responsibilities",
    "role", "seeking", "skills", "strong", "team", "work", "working", "year", "years",
];

static STOP_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ENGLISH.iter().chain(JOB_POSTING).copied().collect());

/// Returns true when `word` (already lowercased) carries no keyword signal.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_words_are_stop_words() {
        for word in ["the", "and", "for", "with"] {
            assert!(is_stop_word(word), "{word} should be a stop-word");
        }
    }

    #[test]
    fn test_job_posting_boilerplate_is_stop_word() {
        assert!(is_stop_word("looking"));
        assert!(is_stop_word("developer"));
    }

    #[test]
    fn test_skills_are_not_stop_words() {
        for word in ["python", "java", "kubernetes", "sql"] {
            assert!(!is_stop_word(word), "{word} should be kept");
        }
    }
}
