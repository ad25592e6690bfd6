//! Curated skill vocabulary.
//!
//! Entries containing a space, hyphen or slash are phrases; everything else is a
//! single term. All entries are lowercase.

pub const SKILLS: &[&str] = &[
    // Languages
    "python", "c++", "c#", "java", "javascript", "typescript", "scala",
    "rust", "go", "golang", "r", "matlab", "julia", "kotlin", "swift",
    // ML / DL frameworks
    "pytorch", "tensorflow", "keras", "jax", "paddle",
    "scikit-learn", "sklearn", "xgboost", "lightgbm", "catboost",
    // Computer vision
    "opencv", "pillow", "albumentations", "timm",
    "yolo", "yolov5", "yolov8", "yolov11",
    "detectron2", "mmdetection", "torchvision",
    "object detection", "instance segmentation", "semantic segmentation",
    "pose estimation", "keypoint estimation", "object tracking",
    "image classification", "2d reconstruction", "3d reconstruction",
    "depth estimation", "optical flow",
    // NLP / LLM
    "transformers", "hugging face", "huggingface", "bert", "gpt",
    "llm", "large language model", "rag", "retrieval augmented generation",
    "langchain", "llamaindex", "llama index",
    "embeddings", "vector search", "semantic search",
    "text generation", "summarization", "question answering",
    // Agents
    "multi-agent", "tool use", "function calling", "react agent",
    "langgraph", "autogen", "crewai", "agentic",
    // MLOps
    "mlflow", "wandb", "weights and biases", "dvc", "neptune",
    "airflow", "kubeflow", "sagemaker", "vertex ai",
    // Inference optimisation
    "onnx", "openvino", "tensorrt", "tflite", "coreml",
    "quantization", "pruning", "distillation",
    "latency-aware inference", "edge deployment",
    // Containers / DevOps
    "docker", "kubernetes", "k8s", "helm", "terraform",
    "ci/cd", "github actions", "gitlab ci", "jenkins",
    "microservices", "rest api", "grpc", "graphql",
    // Cloud
    "aws", "azure", "gcp", "google cloud",
    "ec2", "s3", "lambda", "cloud functions",
    // Databases
    "qdrant", "pinecone", "weaviate", "chroma", "milvus", "faiss",
    "postgresql", "mysql", "mongodb", "redis", "elasticsearch",
    // Data engineering
    "spark", "kafka", "dbt", "pandas", "numpy", "pyspark",
    "data pipeline", "etl", "feature engineering",
    // Web
    "fastapi", "flask", "django", "uvicorn",
    // Research domains
    "tomography", "computational geometry", "signal processing",
    "inverse problems", "computed tomography",
    "ultrasound", "x-ray", "medical imaging",
    // General ML
    "computer vision", "machine learning", "deep learning",
    "neural network", "cnn", "rnn", "lstm", "transformer",
    "attention mechanism", "transfer learning", "fine-tuning",
    "reinforcement learning", "self-supervised learning",
    // Soft skills
    "leadership", "mentoring", "research", "collaboration",
    "technical planning", "system design",
];

/// Subset of `SKILLS` reported as "technologies" (tools, platforms, languages)
/// rather than general skills in resume summaries.
pub const TECHNOLOGY_KEYWORDS: &[&str] = &[
    "pytorch", "tensorflow", "keras", "opencv", "yolo", "docker", "kubernetes",
    "qdrant", "pinecone", "mlflow", "onnx", "openvino", "fastapi", "aws", "gcp",
    "azure", "python", "c++", "java", "typescript", "spark", "kafka", "huggingface",
];

/// True for vocabulary entries matched as phrases.
pub fn is_phrase(skill: &str) -> bool {
    skill.contains(' ') || skill.contains('-') || skill.contains('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_vocabulary_is_lowercase() {
        for skill in SKILLS {
            assert_eq!(*skill, skill.to_lowercase(), "{skill} must be lowercase");
        }
    }

    #[test]
    fn test_technologies_are_vocabulary_members() {
        let vocab: HashSet<&str> = SKILLS.iter().copied().collect();
        for tech in TECHNOLOGY_KEYWORDS {
            assert!(vocab.contains(tech), "{tech} missing from SKILLS");
        }
    }

    #[test]
    fn test_phrase_detection() {
        assert!(is_phrase("machine learning"));
        assert!(is_phrase("scikit-learn"));
        assert!(is_phrase("ci/cd"));
        assert!(!is_phrase("c++"));
        assert!(!is_phrase("python"));
    }
}
